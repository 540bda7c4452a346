//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary values from these primary constants to avoid drift.
//!
//! # Feature-Space Invariants
//!
//! The feature vector is always ordered `[embedding.., behavioral.., temporal..]`
//! and that order is shared by training, scoring and explanation. The widths
//! below are treated as invariants across the `features`, `model` and
//! `explain` modules; changing them invalidates every persisted classifier
//! artifact.

/// Maximum number of terms kept in the lexical (TF-IDF) vocabulary.
pub const MAX_VOCAB_TERMS: usize = 5000;

/// Number of behavioral feature columns produced per request.
pub const BEHAVIORAL_WIDTH: usize = 4;

/// Number of temporal feature columns (reserved extension point).
pub const TEMPORAL_WIDTH: usize = 0;

/// Decision threshold on the fake-class probability.
pub const FAKE_THRESHOLD: f32 = 0.5;

/// Number of feature attributions returned by the explainer.
pub const TOP_K_ATTRIBUTIONS: usize = 10;

/// Default number of perturbation samples spent per explanation.
pub const DEFAULT_SAMPLE_BUDGET: usize = 100;

/// Rows synthesized when no explanation background is supplied.
pub const DEFAULT_BACKGROUND_REPLICAS: usize = 5;

/// Default RNG seed for explanation sampling.
pub const DEFAULT_EXPLAINER_SEED: u64 = 7919;

/// Default dense embedding dimension for the semantic backend.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the semantic encoder.
pub const SEMANTIC_MAX_SEQ_LEN: usize = 512;

/// Artifact-store blob name for the serialized embedder state.
pub const EMBEDDER_ARTIFACT: &str = "embedder";

/// Artifact-store blob name for the serialized classifier state.
pub const CLASSIFIER_ARTIFACT: &str = "classifier";
