use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("artifact store I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid artifact name: {name:?}")]
    InvalidName { name: String },
}
