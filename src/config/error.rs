use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("path exists but is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("unknown embedding backend: {value:?} (expected \"lexical\" or \"semantic\")")]
    InvalidBackend { value: String },

    #[error("failed to parse {var}={value:?} as a number: {source}")]
    NumberParseError {
        var: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("{var} must be non-zero")]
    ZeroNotAllowed { var: &'static str },
}
