use thiserror::Error;

use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("review text is empty")]
    EmptyText,

    #[error("prediction failed: {0}")]
    Prediction(#[from] ModelError),
}
