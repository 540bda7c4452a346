use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("feature row is empty")]
    EmptyRow,

    #[error("background matrix is empty")]
    EmptyBackground,

    #[error("background width mismatch: expected {expected}, got {actual}")]
    BackgroundMismatch { expected: usize, actual: usize },

    #[error("invalid explainer configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("model evaluation failed: {reason}")]
    Evaluation { reason: String },
}
