//! The inference orchestrator: one request-to-response transaction.
//!
//! [`InferenceEngine::score`] runs the sequential pipeline with its two
//! best-effort degradation points:
//!
//! 1. Non-English text is translated; any translator failure is logged and
//!    the original text is scored instead. Never fatal.
//! 2. The model bundle scores the resolved text. Mandatory: its failure is
//!    the request's failure, since no fallback label exists.
//! 3. The feature vector is rebuilt for the same text and explained; any
//!    failure degrades to a placeholder in `details.shap`.
//!
//! The engine is constructed once with its bundle and translator injected
//! and is shared across concurrent requests. Retraining swaps in a new
//! bundle atomically via [`InferenceEngine::replace_bundle`].

mod error;
mod types;

#[cfg(test)]
mod tests;

pub use error::PipelineError;
pub use types::{
    ExplanationOutcome, Identity, PredictionDetails, ReviewSubmission, ScoredReview,
};

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::explain::{ExplainError, ExplainerConfig, explain};
use crate::model::{ModelBundle, ReviewMetadata};
use crate::translate::Translator;

/// Language code reviews are scored in.
const SCORING_LANGUAGE: &str = "en";

/// Scores review submissions against a shared model bundle.
pub struct InferenceEngine {
    bundle: RwLock<Arc<ModelBundle>>,
    translator: Arc<dyn Translator>,
    explainer: ExplainerConfig,
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("bundle", &*self.bundle.read())
            .field("explainer", &self.explainer)
            .finish()
    }
}

impl InferenceEngine {
    /// Creates an engine around an already constructed bundle.
    pub fn new(
        bundle: Arc<ModelBundle>,
        translator: Arc<dyn Translator>,
        explainer: ExplainerConfig,
    ) -> Self {
        Self {
            bundle: RwLock::new(bundle),
            translator,
            explainer,
        }
    }

    /// The bundle currently serving traffic.
    pub fn bundle(&self) -> Arc<ModelBundle> {
        Arc::clone(&self.bundle.read())
    }

    /// Atomically swaps in a new bundle (after retraining). In-flight
    /// requests finish on the bundle they started with.
    pub fn replace_bundle(&self, bundle: Arc<ModelBundle>) {
        info!("replacing the serving model bundle");
        *self.bundle.write() = bundle;
    }

    /// Scores one submission end to end.
    pub async fn score(&self, submission: &ReviewSubmission) -> Result<ScoredReview, PipelineError> {
        if submission.text.trim().is_empty() {
            return Err(PipelineError::EmptyText);
        }

        let (text, language) = self.resolve_text(submission).await;
        let bundle = self.bundle();

        let prediction = bundle.predict(&text, submission.metadata.as_ref())?;

        let shap = self.explain_prediction(&bundle, &text, submission.metadata.as_ref());

        Ok(ScoredReview {
            label: prediction.label,
            trust_score: prediction.trust_score,
            details: PredictionDetails {
                p_fake: prediction.p_fake,
                shap,
            },
            language,
        })
    }

    /// Scores one submission on behalf of a verified identity.
    pub async fn score_identified(
        &self,
        identity: &Identity,
        submission: &ReviewSubmission,
    ) -> Result<ScoredReview, PipelineError> {
        debug!(actor = %identity.id, role = %identity.role, "scoring on behalf of identity");
        self.score(submission).await
    }

    /// Resolves the text to score and the language code to echo.
    ///
    /// Translation failures are degradable: the original text and language
    /// code win.
    async fn resolve_text(&self, submission: &ReviewSubmission) -> (String, String) {
        if submission.language_code == SCORING_LANGUAGE {
            return (submission.text.clone(), SCORING_LANGUAGE.to_string());
        }

        match self
            .translator
            .translate(&submission.text, SCORING_LANGUAGE)
            .await
        {
            Ok(translated) => {
                debug!(
                    from = %submission.language_code,
                    "submission translated for scoring"
                );
                (translated, SCORING_LANGUAGE.to_string())
            }
            Err(e) => {
                warn!(
                    language = %submission.language_code,
                    error = %e,
                    "translation unavailable, scoring the original text"
                );
                (submission.text.clone(), submission.language_code.clone())
            }
        }
    }

    /// Best-effort explanation: rebuilds the feature vector through the same
    /// contract the prediction used and attributes the fake probability.
    fn explain_prediction(
        &self,
        bundle: &ModelBundle,
        text: &str,
        metadata: Option<&ReviewMetadata>,
    ) -> ExplanationOutcome {
        let row = match bundle.feature_vector(text, metadata) {
            Ok(row) => row,
            Err(e) => return Self::degraded_explanation(&e.to_string()),
        };

        let classifier = bundle.classifier();
        let predict_proba = |matrix: &[Vec<f32>]| {
            classifier
                .predict_proba(matrix)
                .map_err(|e| ExplainError::Evaluation {
                    reason: e.to_string(),
                })
        };

        match explain(predict_proba, &row, None, &self.explainer) {
            Ok(attributions) => ExplanationOutcome::Attributions(attributions),
            Err(e) => {
                warn!(error = %e, "explanation failed, attaching placeholder");
                Self::degraded_explanation(&e.to_string())
            }
        }
    }

    fn degraded_explanation(reason: &str) -> ExplanationOutcome {
        ExplanationOutcome::Unavailable {
            reason: format!("explanation generation failed: {reason}"),
        }
    }
}
