use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("no translation backend configured")]
    NotConfigured,

    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("translation backend rejected the request: {reason}")]
    Backend { reason: String },

    #[error("malformed translation response: {reason}")]
    MalformedResponse { reason: String },
}
