use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::explain::Attributions;
use crate::model::{Label, ReviewMetadata};

fn default_language() -> String {
    "en".to_string()
}

/// One review to score: the unit of work for a pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub text: String,
    /// ISO-639-1 code of the submitted text.
    #[serde(default = "default_language")]
    pub language_code: String,
    #[serde(default)]
    pub metadata: Option<ReviewMetadata>,
}

impl ReviewSubmission {
    /// Creates an English submission without metadata.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            language_code: default_language(),
            metadata: None,
        }
    }

    /// Sets the language code.
    pub fn with_language<S: Into<String>>(mut self, language_code: S) -> Self {
        self.language_code = language_code.into();
        self
    }

    /// Attaches behavioral metadata.
    pub fn with_metadata(mut self, metadata: ReviewMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Verified caller identity, supplied by the identity collaborator.
///
/// The pipeline only logs it; how the identity was established is not its
/// concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub role: String,
}

/// Outcome of the best-effort explanation stage.
///
/// Serializes either as the attribution object or, when degraded, as a
/// placeholder string — explanation failures never fail the request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExplanationOutcome {
    Attributions(Attributions),
    Unavailable { reason: String },
}

impl ExplanationOutcome {
    /// Returns `true` when real attributions are present.
    pub fn is_available(&self) -> bool {
        matches!(self, ExplanationOutcome::Attributions(_))
    }

    /// The attributions, if available.
    pub fn attributions(&self) -> Option<&Attributions> {
        match self {
            ExplanationOutcome::Attributions(a) => Some(a),
            ExplanationOutcome::Unavailable { .. } => None,
        }
    }
}

impl Serialize for ExplanationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExplanationOutcome::Attributions(a) => a.serialize(serializer),
            ExplanationOutcome::Unavailable { reason } => serializer.serialize_str(reason),
        }
    }
}

/// Explanation payload attached to every response: the fake-class
/// probability plus the (possibly degraded) attribution block.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionDetails {
    pub p_fake: f32,
    pub shap: ExplanationOutcome,
}

/// The pipeline's response for one submission.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredReview {
    pub label: Label,
    pub trust_score: f32,
    pub details: PredictionDetails,
    /// The language code the text was actually scored in: `"en"` after a
    /// successful translation, the submitted code otherwise.
    pub language: String,
}
