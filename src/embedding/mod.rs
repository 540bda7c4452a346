//! Text embedding: two interchangeable backends behind one contract.
//!
//! - [`lexical`] provides the sparse TF-IDF vectorizer.
//! - [`semantic`] provides the dense BERT sentence encoder.
//!
//! [`TextEmbedder`] is the tagged state machine over the two. It allows one
//! transition, `Semantic -> Lexical`, taken at most once when the semantic
//! model fails to load; there is no way back for the lifetime of the
//! instance.

/// Compute device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Sparse TF-IDF backend.
pub mod lexical;
/// Dense sentence-encoder backend.
pub mod semantic;


pub use error::EmbeddingError;
pub use lexical::TfidfVectorizer;
pub use semantic::{SemanticConfig, SentenceEncoder};

use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Which embedding backend an embedder is currently using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderBackendKind {
    /// Sparse TF-IDF over a fitted vocabulary.
    #[default]
    Lexical,
    /// Dense pretrained sentence encoder.
    Semantic,
}

impl FromStr for EmbedderBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" | "tfidf" => Ok(Self::Lexical),
            "semantic" => Ok(Self::Semantic),
            other => Err(format!("unknown embedding backend: {other}")),
        }
    }
}

impl std::fmt::Display for EmbedderBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Semantic => write!(f, "semantic"),
        }
    }
}

/// Serializable embedder state for the `embedder` artifact blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum EmbedderArtifact {
    Lexical { vectorizer: TfidfVectorizer },
    Semantic { config: SemanticConfig },
}

enum BackendState {
    Lexical(TfidfVectorizer),
    Semantic {
        config: SemanticConfig,
        encoder: Option<SentenceEncoder>,
    },
}

/// Text embedder with interchangeable lexical/semantic backends.
///
/// `fit` and `transform` share one contract across both backends. Two
/// behaviors are deliberate and documented:
///
/// - **Lexical auto-fit quirk**: `transform` on an unfitted lexical backend
///   fits the vocabulary on the incoming batch. Repeated cold starts on
///   different inputs silently change the output width, so callers must fit
///   once and reuse the same instance.
/// - **One-way downgrade**: if the semantic model cannot be loaded on first
///   use, the embedder permanently becomes lexical. The transition happens
///   under the write lock, at most once, so concurrent callers do not race
///   redundant load attempts.
pub struct TextEmbedder {
    state: RwLock<BackendState>,
}

impl std::fmt::Debug for TextEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        let (backend, width) = match &*state {
            BackendState::Lexical(v) => ("Lexical", v.width()),
            BackendState::Semantic { config, .. } => ("Semantic", config.embedding_dim),
        };
        f.debug_struct("TextEmbedder")
            .field("backend", &backend)
            .field("embedding_dim", &width)
            .finish()
    }
}

impl TextEmbedder {
    /// Creates an unfitted lexical embedder.
    pub fn lexical() -> Self {
        Self {
            state: RwLock::new(BackendState::Lexical(TfidfVectorizer::new())),
        }
    }

    /// Creates a semantic embedder; the model loads lazily on first
    /// `transform`.
    pub fn semantic(config: SemanticConfig) -> Self {
        Self {
            state: RwLock::new(BackendState::Semantic {
                config,
                encoder: None,
            }),
        }
    }

    /// Restores an embedder from a persisted artifact.
    ///
    /// A semantic artifact restores to the lazy pre-load state, so the
    /// restored instance behaves exactly like a freshly constructed one.
    pub fn restore(artifact: EmbedderArtifact) -> Self {
        match artifact {
            EmbedderArtifact::Lexical { vectorizer } => Self {
                state: RwLock::new(BackendState::Lexical(vectorizer)),
            },
            EmbedderArtifact::Semantic { config } => Self::semantic(config),
        }
    }

    /// Captures the current state as a serializable artifact.
    pub fn snapshot(&self) -> EmbedderArtifact {
        match &*self.state.read() {
            BackendState::Lexical(v) => EmbedderArtifact::Lexical {
                vectorizer: v.clone(),
            },
            BackendState::Semantic { config, .. } => EmbedderArtifact::Semantic {
                config: config.clone(),
            },
        }
    }

    /// Fits the backend on a corpus.
    ///
    /// Lexical: builds the vocabulary (errors on an empty corpus).
    /// Semantic: no fit step is required or meaningful.
    pub fn fit(&self, corpus: &[String]) -> Result<(), EmbeddingError> {
        let mut state = self.state.write();
        match &mut *state {
            BackendState::Lexical(v) => v.fit(corpus),
            BackendState::Semantic { .. } => {
                debug!("semantic backend has no fit step");
                Ok(())
            }
        }
    }

    /// Transforms texts into embedding rows of fixed width.
    pub fn transform(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        {
            let state = self.state.read();
            match &*state {
                BackendState::Lexical(v) if v.is_fitted() => return v.transform(texts),
                BackendState::Semantic {
                    encoder: Some(encoder),
                    ..
                } => return encoder.encode_batch(texts),
                _ => {}
            }
        }

        self.transform_slow(texts)
    }

    /// Slow path: resolves a pending semantic load or an unfitted lexical
    /// vocabulary under the write lock, then transforms.
    fn transform_slow(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut state = self.state.write();

        let pending = match &*state {
            BackendState::Semantic {
                config,
                encoder: None,
            } => Some(config.clone()),
            _ => None,
        };

        if let Some(config) = pending {
            match SentenceEncoder::load(&config) {
                Ok(encoder) => {
                    info!(embedding_dim = encoder.embedding_dim(), "semantic encoder ready");
                    *state = BackendState::Semantic {
                        config,
                        encoder: Some(encoder),
                    };
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        "semantic model unavailable, downgrading to the lexical backend for the lifetime of this embedder"
                    );
                    *state = BackendState::Lexical(TfidfVectorizer::new());
                }
            }
        }

        match &mut *state {
            BackendState::Lexical(v) => {
                if !v.is_fitted() {
                    warn!(
                        batch = texts.len(),
                        "lexical vocabulary not fitted, auto-fitting on the incoming batch"
                    );
                    v.fit(texts)?;
                }
                v.transform(texts)
            }
            BackendState::Semantic {
                encoder: Some(encoder),
                ..
            } => encoder.encode_batch(texts),
            BackendState::Semantic { encoder: None, .. } => Err(EmbeddingError::InferenceFailed {
                reason: "semantic encoder missing after load".to_string(),
            }),
        }
    }

    /// Output width of one embedding row.
    ///
    /// Lexical: vocabulary size (0 until fitted). Semantic: configured
    /// dimension.
    pub fn embedding_dim(&self) -> usize {
        match &*self.state.read() {
            BackendState::Lexical(v) => v.width(),
            BackendState::Semantic { config, .. } => config.embedding_dim,
        }
    }

    /// The backend currently in effect (reflects a completed downgrade).
    pub fn backend_kind(&self) -> EmbedderBackendKind {
        match &*self.state.read() {
            BackendState::Lexical(_) => EmbedderBackendKind::Lexical,
            BackendState::Semantic { .. } => EmbedderBackendKind::Semantic,
        }
    }

    /// Returns `true` once the embedder can produce fixed-width rows without
    /// auto-fitting.
    pub fn is_fitted(&self) -> bool {
        match &*self.state.read() {
            BackendState::Lexical(v) => v.is_fitted(),
            BackendState::Semantic { .. } => true,
        }
    }
}
