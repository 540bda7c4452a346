use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("artifact storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("artifact serialization failed: {reason}")]
    Artifact { reason: String },

    #[error("feature width mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("training failed: {reason}")]
    Training { reason: String },

    #[error("internal model error: {reason}")]
    Internal { reason: String },
}
