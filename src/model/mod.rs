//! The model bundle: one embedder plus one trained classifier, owned and
//! persisted as a single versioned unit.
//!
//! A bundle is constructed once at startup with [`ModelBundle::load`] and is
//! read-only afterwards; it is safe to share behind an `Arc` across
//! concurrent scoring calls. Retraining never mutates a live bundle — it
//! produces a new one (see [`ModelBundle::train`]) for the caller to swap in.

/// Logistic-regression classifier.
pub mod classifier;
mod error;
/// Bootstrap seed fixture.
pub mod seed;
/// Corpus training.
pub mod train;
mod types;

#[cfg(test)]
mod tests;

pub use classifier::{DEFAULT_EPOCHS, DEFAULT_LEARNING_RATE, LogisticRegression};
pub use error::ModelError;
pub use train::TrainingExample;
pub use types::{Label, Prediction, ReviewMetadata};

use tracing::{debug, info};

use crate::constants::{CLASSIFIER_ARTIFACT, EMBEDDER_ARTIFACT, FAKE_THRESHOLD};
use crate::embedding::{EmbedderArtifact, EmbedderBackendKind, SemanticConfig, TextEmbedder};
use crate::features::{BehaviorRecord, assemble, behavioral, temporal};
use crate::normalize::normalize;
use crate::storage::ArtifactStore;

use seed::SEED_REVIEWS;

/// How a bundle came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleOrigin {
    /// Synthesized from the seed fixture because no artifacts were persisted.
    Bootstrapped,
    /// Restored from persisted artifacts.
    Loaded,
    /// Produced by corpus training.
    Trained,
}

/// Embedder selection for bundle construction.
#[derive(Debug, Clone, Default)]
pub struct BundleConfig {
    pub backend: EmbedderBackendKind,
    /// Semantic encoder settings; only read when `backend` is `Semantic`.
    pub semantic: SemanticConfig,
}

impl BundleConfig {
    /// Lexical TF-IDF embedder (the default).
    pub fn lexical() -> Self {
        Self::default()
    }

    /// Semantic sentence-encoder embedder.
    pub fn semantic(semantic: SemanticConfig) -> Self {
        Self {
            backend: EmbedderBackendKind::Semantic,
            semantic,
        }
    }

    pub(crate) fn build_embedder(&self) -> TextEmbedder {
        match self.backend {
            EmbedderBackendKind::Lexical => TextEmbedder::lexical(),
            EmbedderBackendKind::Semantic => TextEmbedder::semantic(self.semantic.clone()),
        }
    }
}

/// An embedder and classifier pair, scoring one review at a time.
#[derive(Debug)]
pub struct ModelBundle {
    embedder: TextEmbedder,
    classifier: LogisticRegression,
    origin: BundleOrigin,
}

impl ModelBundle {
    /// Loads the bundle from the artifact store, bootstrapping from the seed
    /// fixture when no artifacts exist.
    ///
    /// Idempotent: a bootstrap persists both artifacts immediately, so every
    /// later call restores the same logical state. Construct once per
    /// process and share the instance.
    pub fn load(store: &dyn ArtifactStore, config: &BundleConfig) -> Result<Self, ModelError> {
        let embedder_blob = store.read(EMBEDDER_ARTIFACT)?;
        let classifier_blob = store.read(CLASSIFIER_ARTIFACT)?;

        if let (Some(embedder_blob), Some(classifier_blob)) = (embedder_blob, classifier_blob) {
            let artifact: EmbedderArtifact = serde_json::from_slice(&embedder_blob)
                .map_err(|e| ModelError::Artifact {
                    reason: format!("embedder artifact: {e}"),
                })?;
            let classifier: LogisticRegression = serde_json::from_slice(&classifier_blob)
                .map_err(|e| ModelError::Artifact {
                    reason: format!("classifier artifact: {e}"),
                })?;

            info!("model bundle restored from persisted artifacts");
            return Ok(Self {
                embedder: TextEmbedder::restore(artifact),
                classifier,
                origin: BundleOrigin::Loaded,
            });
        }

        info!("no persisted artifacts found, bootstrapping from the seed corpus");
        let bundle = Self::bootstrap(config)?;
        bundle.persist(store)?;
        Ok(bundle)
    }

    /// Trains the cold-start bundle on the seed fixture.
    fn bootstrap(config: &BundleConfig) -> Result<Self, ModelError> {
        let embedder = config.build_embedder();

        let cleaned: Vec<String> = SEED_REVIEWS.iter().map(|r| normalize(r.text)).collect();
        embedder.fit(&cleaned)?;
        let embeddings = embedder.transform(&cleaned)?;

        let records: Vec<BehaviorRecord<'_>> = SEED_REVIEWS
            .iter()
            .zip(cleaned.iter())
            .map(|(review, text)| BehaviorRecord {
                text,
                verified: Some(review.verified),
                account_age_days: Some(review.account_age_days),
            })
            .collect();

        let features = assemble(&embeddings, &behavioral(&records), &temporal(&records));
        let labels: Vec<bool> = SEED_REVIEWS.iter().map(|r| r.fake).collect();

        let classifier =
            LogisticRegression::fit(&features, &labels, DEFAULT_LEARNING_RATE, DEFAULT_EPOCHS)?;

        info!(
            feature_width = classifier.n_features(),
            "bootstrap complete"
        );

        Ok(Self {
            embedder,
            classifier,
            origin: BundleOrigin::Bootstrapped,
        })
    }

    /// Writes both artifacts to the store.
    pub fn persist(&self, store: &dyn ArtifactStore) -> Result<(), ModelError> {
        let embedder_blob =
            serde_json::to_vec(&self.embedder.snapshot()).map_err(|e| ModelError::Artifact {
                reason: format!("embedder artifact: {e}"),
            })?;
        store.write(EMBEDDER_ARTIFACT, &embedder_blob)?;

        let classifier_blob =
            serde_json::to_vec(&self.classifier).map_err(|e| ModelError::Artifact {
                reason: format!("classifier artifact: {e}"),
            })?;
        store.write(CLASSIFIER_ARTIFACT, &classifier_blob)?;

        debug!("model artifacts persisted");
        Ok(())
    }

    /// Builds the feature vector for one review, using the same
    /// normalize -> embed -> assemble contract as training.
    pub fn feature_vector(
        &self,
        text: &str,
        metadata: Option<&ReviewMetadata>,
    ) -> Result<Vec<f32>, ModelError> {
        let cleaned = normalize(text);
        let embedding = self.embedder.transform(std::slice::from_ref(&cleaned))?;

        let records = [BehaviorRecord {
            text: &cleaned,
            verified: metadata.map(|m| m.verified),
            account_age_days: metadata.map(|m| m.account_age_days),
        }];

        let mut rows = assemble(&embedding, &behavioral(&records), &temporal(&records));
        rows.pop().ok_or_else(|| ModelError::Internal {
            reason: "feature assembly produced no rows".to_string(),
        })
    }

    /// Scores one review: fake-class probability, decision label and trust
    /// score.
    pub fn predict(
        &self,
        text: &str,
        metadata: Option<&ReviewMetadata>,
    ) -> Result<Prediction, ModelError> {
        let features = self.feature_vector(text, metadata)?;
        let p_fake = self.classifier.predict_proba(std::slice::from_ref(&features))?[0];

        let label = if p_fake >= FAKE_THRESHOLD {
            Label::Fake
        } else {
            Label::Genuine
        };
        let trust_score = match label {
            Label::Fake => 1.0 - p_fake,
            Label::Genuine => p_fake,
        };

        debug!(%label, p_fake, trust_score, "review scored");

        Ok(Prediction {
            label,
            trust_score,
            p_fake,
        })
    }

    /// The embedder half of the bundle.
    pub fn embedder(&self) -> &TextEmbedder {
        &self.embedder
    }

    /// The classifier half of the bundle.
    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    /// How this bundle was constructed.
    pub fn origin(&self) -> BundleOrigin {
        self.origin
    }

    /// Total feature-vector width the classifier expects.
    pub fn feature_width(&self) -> usize {
        self.classifier.n_features()
    }
}
