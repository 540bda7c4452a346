//! Credence library crate: trust scoring for user-generated review text.
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Pipeline (Stable)
//! - [`InferenceEngine`], [`ReviewSubmission`], [`ScoredReview`] - request
//!   scoring, end to end
//! - [`PipelineError`], [`ExplanationOutcome`] - failure and degradation
//!   surfaces
//!
//! ## Model
//! - [`ModelBundle`], [`BundleConfig`], [`BundleOrigin`] - the embedder +
//!   classifier unit, its construction and persistence
//! - [`Label`], [`Prediction`], [`ReviewMetadata`], [`TrainingExample`]
//!
//! ## Embedding
//! - [`TextEmbedder`], [`EmbedderBackendKind`], [`EmbedderArtifact`] - the
//!   lexical/semantic backend state machine
//! - [`TfidfVectorizer`], [`SemanticConfig`], [`SentenceEncoder`]
//!
//! ## Supporting
//! - [`Config`] - `CREDENCE_*` environment configuration
//! - [`ArtifactStore`], [`FsArtifactStore`] - named-blob persistence
//! - [`Translator`], [`HttpTranslator`], [`NoopTranslator`] - the
//!   fail-soft translation collaborator
//! - [`explain`], [`Attributions`], [`ExplainerConfig`] - perturbation
//!   attribution
//! - [`normalize`] - text normalization
//!
//! ## Test/Mock Support
//! Mock implementations are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod explain;
pub mod features;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod storage;
pub mod translate;

pub use config::{Config, ConfigError};
pub use constants::{
    BEHAVIORAL_WIDTH, DEFAULT_EMBEDDING_DIM, DEFAULT_SAMPLE_BUDGET, FAKE_THRESHOLD,
    MAX_VOCAB_TERMS, TEMPORAL_WIDTH, TOP_K_ATTRIBUTIONS,
};
pub use embedding::{
    EmbedderArtifact, EmbedderBackendKind, EmbeddingError, SemanticConfig, SentenceEncoder,
    TextEmbedder, TfidfVectorizer,
};
pub use explain::{Attributions, ExplainError, ExplainerConfig, explain};
pub use features::{BEHAVIORAL_COLUMNS, BehaviorRecord, assemble, behavioral, temporal};
pub use model::{
    BundleConfig, BundleOrigin, Label, LogisticRegression, ModelBundle, ModelError, Prediction,
    ReviewMetadata, TrainingExample,
};
pub use normalize::normalize;
pub use pipeline::{
    ExplanationOutcome, Identity, InferenceEngine, PipelineError, PredictionDetails,
    ReviewSubmission, ScoredReview,
};
pub use storage::{ArtifactStore, FsArtifactStore, StorageError};
#[cfg(any(test, feature = "mock"))]
pub use storage::MemoryArtifactStore;
pub use translate::{HttpTranslator, NoopTranslator, TranslateError, Translator};
#[cfg(any(test, feature = "mock"))]
pub use translate::{FailingTranslator, FixedTranslator};
