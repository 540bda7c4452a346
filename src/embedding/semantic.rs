//! Dense semantic embedding: a BERT sentence encoder loaded from a model
//! directory (`config.json` + `model.safetensors` + `tokenizer.json`),
//! mean-pooled and L2-normalized.
//!
//! Use [`SemanticConfig::stub`] for tests without model files.

use std::path::{Path, PathBuf};

use candle_core::{Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use serde::{Deserialize, Serialize};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::constants::{DEFAULT_EMBEDDING_DIM, SEMANTIC_MAX_SEQ_LEN};

use super::device::select_device;
use super::error::EmbeddingError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Configuration for the semantic [`SentenceEncoder`].
pub struct SemanticConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_path: PathBuf,
    /// Output embedding dimension (leading components of the pooled state).
    pub embedding_dim: usize,
    /// Max tokens to consider per text.
    pub max_seq_len: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::new(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            max_seq_len: SEMANTIC_MAX_SEQ_LEN,
            testing_stub: false,
        }
    }
}

impl SemanticConfig {
    /// Creates a config pointing at a model directory.
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: model_path.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (deterministic embeddings, no model files).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be non-zero".to_string(),
            });
        }

        if self.testing_stub {
            return Ok(());
        }

        if self.model_path.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_path is required (stubbing is disabled)".to_string(),
            });
        }

        Ok(())
    }
}

enum EncoderBackend {
    Model {
        model: BertModel,
        tokenizer: Tokenizer,
        device: Device,
        max_seq_len: usize,
    },
    Stub,
}

/// Sentence embedding generator (supports stub mode).
pub struct SentenceEncoder {
    backend: EncoderBackend,
    embedding_dim: usize,
}

impl std::fmt::Debug for SentenceEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({device:?})"),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.embedding_dim)
            .finish()
    }
}

impl SentenceEncoder {
    /// Loads the encoder from a config (stub mode is supported).
    pub fn load(config: &SemanticConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            debug!("semantic encoder running in stub mode");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                embedding_dim: config.embedding_dim,
            });
        }

        let device = select_device()?;
        let (model, tokenizer) = Self::load_model(config, &device)?;

        info!(
            model_path = %config.model_path.display(),
            embedding_dim = config.embedding_dim,
            "semantic encoder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer,
                device,
                max_seq_len: config.max_seq_len,
            },
            embedding_dim: config.embedding_dim,
        })
    }

    fn load_model(
        config: &SemanticConfig,
        device: &Device,
    ) -> Result<(BertModel, Tokenizer), EmbeddingError> {
        let dir = &config.model_path;
        if !dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound { path: dir.clone() });
        }

        let config_path = dir.join("config.json");
        let weights_path = dir.join("model.safetensors");
        let tokenizer_path = dir.join("tokenizer.json");
        for required in [&config_path, &weights_path, &tokenizer_path] {
            if !required.is_file() {
                return Err(EmbeddingError::ModelNotFound {
                    path: required.clone(),
                });
            }
        }

        let config_content = std::fs::read_to_string(&config_path)?;
        let bert_config: BertConfig =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to parse config.json: {e}"),
            })?;

        if config.embedding_dim > bert_config.hidden_size {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!(
                    "embedding_dim ({}) exceeds model hidden_size ({})",
                    config.embedding_dim, bert_config.hidden_size
                ),
            });
        }

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], candle_core::DType::F32, device)?
        };

        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &bert_config)
        } else {
            BertModel::load(vb, &bert_config)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("failed to load BERT weights: {e}"),
        })?;

        let tokenizer = load_tokenizer(&tokenizer_path, config.max_seq_len)?;

        Ok((model, tokenizer))
    }

    /// Encodes a batch of texts into normalized dense rows.
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    /// Encodes a single text into a normalized dense vector.
    pub fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
                max_seq_len,
            } => self.encode_with_model(text, model, tokenizer, device, *max_seq_len),
            EncoderBackend::Stub => Ok(self.encode_stub(text)),
        }
    }

    fn encode_with_model(
        &self,
        text: &str,
        model: &BertModel,
        tokenizer: &Tokenizer,
        device: &Device,
        max_seq_len: usize,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let mut tokens: Vec<u32> = encoding.get_ids().to_vec();
        if tokens.is_empty() {
            return Ok(vec![0.0; self.embedding_dim]);
        }
        if tokens.len() > max_seq_len {
            tokens.truncate(max_seq_len);
        }

        debug!(
            text_len = text.len(),
            token_count = tokens.len(),
            "encoding text (mean-pooled forward pass)"
        );

        let input_ids = Tensor::new(&tokens[..], device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;

        // [1, seq_len, hidden] -> mean over the token axis -> [1, hidden]
        let hidden = model.forward(&input_ids, &token_type_ids, None)?;
        let pooled = hidden.mean(1)?;
        let embedding = pooled.i((0, ..self.embedding_dim))?.to_vec1::<f32>()?;

        Ok(l2_normalize(embedding))
    }

    fn encode_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut embedding = Vec::with_capacity(self.embedding_dim);
        for _ in 0..self.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        l2_normalize(embedding)
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }
}

fn load_tokenizer(path: &Path, max_seq_len: usize) -> Result<Tokenizer, EmbeddingError> {
    let mut tokenizer =
        Tokenizer::from_file(path).map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("failed to load tokenizer: {e}"),
        })?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_seq_len,
            ..Default::default()
        }))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: e.to_string(),
        })?;

    Ok(tokenizer)
}

fn l2_normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}
