//! Corpus training: fit a fresh embedder and classifier on labelled reviews
//! and persist the result as a new bundle.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::features::{BehaviorRecord, assemble, behavioral, temporal};
use crate::normalize::normalize;
use crate::storage::ArtifactStore;

use super::classifier::{DEFAULT_EPOCHS, DEFAULT_LEARNING_RATE, LogisticRegression};
use super::error::ModelError;
use super::{BundleConfig, BundleOrigin, ModelBundle};

/// One labelled review for training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub fake: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub account_age_days: u32,
}

impl ModelBundle {
    /// Trains a new bundle on `corpus` and persists its artifacts.
    ///
    /// Cleaning mirrors dataset preparation: texts are normalized, exact
    /// duplicates (after normalization) are dropped keeping the first
    /// occurrence, and texts of one character or less are discarded. The
    /// returned bundle never replaces a live one in place; callers swap the
    /// shared reference themselves.
    pub fn train(
        store: &dyn ArtifactStore,
        config: &BundleConfig,
        corpus: &[TrainingExample],
    ) -> Result<Self, ModelError> {
        let mut seen = std::collections::HashSet::new();
        let mut cleaned: Vec<String> = Vec::with_capacity(corpus.len());
        let mut kept: Vec<&TrainingExample> = Vec::with_capacity(corpus.len());

        for example in corpus {
            let text = normalize(&example.text);
            if text.chars().count() <= 1 || !seen.insert(text.clone()) {
                continue;
            }
            cleaned.push(text);
            kept.push(example);
        }

        if kept.is_empty() {
            return Err(ModelError::Training {
                reason: "no usable training examples after cleaning".to_string(),
            });
        }

        let embedder = config.build_embedder();
        embedder.fit(&cleaned)?;
        let embeddings = embedder.transform(&cleaned)?;

        let records: Vec<BehaviorRecord<'_>> = kept
            .iter()
            .zip(cleaned.iter())
            .map(|(example, text)| BehaviorRecord {
                text,
                verified: Some(example.verified),
                account_age_days: Some(example.account_age_days),
            })
            .collect();

        let features = assemble(&embeddings, &behavioral(&records), &temporal(&records));
        let labels: Vec<bool> = kept.iter().map(|e| e.fake).collect();

        let classifier =
            LogisticRegression::fit(&features, &labels, DEFAULT_LEARNING_RATE, DEFAULT_EPOCHS)?;

        let bundle = Self {
            embedder,
            classifier,
            origin: BundleOrigin::Trained,
        };
        bundle.persist(store)?;

        info!(
            examples = kept.len(),
            discarded = corpus.len() - kept.len(),
            feature_width = bundle.feature_width(),
            "bundle trained from corpus"
        );

        Ok(bundle)
    }
}
