//! Translation collaborator used by the inference orchestrator.
//!
//! Translation is an enrichment, never a requirement: the orchestrator
//! treats every [`TranslateError`] as fail-soft and scores the original
//! text. [`HttpTranslator`] speaks the LibreTranslate-style JSON surface.

mod error;


pub use error::TranslateError;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
/// External text-translation capability.
pub trait Translator: Send + Sync {
    /// Translates `text` into the `target` ISO-639-1 language.
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError>;
}

/// HTTP translation client posting `{q, source, target, format}` to a
/// configured endpoint.
pub struct HttpTranslator {
    endpoint: String,
    client: HttpClient,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl HttpTranslator {
    /// Creates a client for `endpoint` with a fixed request timeout.
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: HttpClient::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
        }
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        let request = TranslateRequest {
            q: text,
            source: "auto",
            target,
            format: "text",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Backend {
                reason: format!("endpoint returned status {status}"),
            });
        }

        let body: TranslateResponse =
            response
                .json()
                .await
                .map_err(|e| TranslateError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        if body.translated_text.trim().is_empty() {
            return Err(TranslateError::MalformedResponse {
                reason: "empty translatedText".to_string(),
            });
        }

        debug!(
            target,
            input_len = text.len(),
            output_len = body.translated_text.len(),
            "text translated"
        );

        Ok(body.translated_text)
    }
}

/// Translator used when no endpoint is configured; always reports itself
/// unavailable so the orchestrator proceeds with the original text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, _text: &str, _target: &str) -> Result<String, TranslateError> {
        Err(TranslateError::NotConfigured)
    }
}

/// Translator that returns a fixed output (tests).
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct FixedTranslator {
    pub output: String,
}

#[cfg(any(test, feature = "mock"))]
impl FixedTranslator {
    pub fn new<S: Into<String>>(output: S) -> Self {
        Self {
            output: output.into(),
        }
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl Translator for FixedTranslator {
    async fn translate(&self, _text: &str, _target: &str) -> Result<String, TranslateError> {
        Ok(self.output.clone())
    }
}

/// Translator that always fails (tests).
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingTranslator;

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(&self, _text: &str, _target: &str) -> Result<String, TranslateError> {
        Err(TranslateError::Backend {
            reason: "forced failure".to_string(),
        })
    }
}
