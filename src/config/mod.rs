//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CREDENCE_*` environment
//! variables.

mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_SAMPLE_BUDGET, SEMANTIC_MAX_SEQ_LEN};
use crate::embedding::{EmbedderBackendKind, SemanticConfig};
use crate::explain::ExplainerConfig;
use crate::model::BundleConfig;

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CREDENCE_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for persisted model artifacts. Default: `./models`.
    pub storage_path: PathBuf,

    /// Embedding backend to construct new bundles with. Default: lexical.
    pub embedding_backend: EmbedderBackendKind,

    /// Directory of the semantic sentence-encoder model (config.json +
    /// model.safetensors + tokenizer.json).
    pub semantic_model_path: Option<PathBuf>,

    /// Dense embedding dimension for the semantic backend. Default: `384`.
    pub embedding_dim: usize,

    /// Translation endpoint URL; translation is skipped when unset.
    pub translate_url: Option<String>,

    /// Explainer perturbation-sample budget. Default: `100`.
    pub sample_budget: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./models"),
            embedding_backend: EmbedderBackendKind::Lexical,
            semantic_model_path: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            translate_url: None,
            sample_budget: DEFAULT_SAMPLE_BUDGET,
        }
    }
}

impl Config {
    pub const ENV_STORAGE_PATH: &'static str = "CREDENCE_STORAGE_PATH";
    pub const ENV_EMBEDDING_BACKEND: &'static str = "CREDENCE_EMBEDDING_BACKEND";
    pub const ENV_SEMANTIC_MODEL_PATH: &'static str = "CREDENCE_SEMANTIC_MODEL_PATH";
    pub const ENV_EMBEDDING_DIM: &'static str = "CREDENCE_EMBEDDING_DIM";
    pub const ENV_TRANSLATE_URL: &'static str = "CREDENCE_TRANSLATE_URL";
    pub const ENV_SAMPLE_BUDGET: &'static str = "CREDENCE_SAMPLE_BUDGET";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let embedding_backend = Self::parse_backend_from_env(defaults.embedding_backend)?;
        let semantic_model_path = Self::parse_optional_path_from_env(Self::ENV_SEMANTIC_MODEL_PATH);
        let embedding_dim =
            Self::parse_usize_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let translate_url = Self::parse_optional_string_from_env(Self::ENV_TRANSLATE_URL);
        let sample_budget =
            Self::parse_usize_from_env(Self::ENV_SAMPLE_BUDGET, defaults.sample_budget)?;

        Ok(Self {
            storage_path,
            embedding_backend,
            semantic_model_path,
            embedding_dim,
            translate_url,
            sample_budget,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        if let Some(ref path) = self.semantic_model_path {
            if path.exists() && !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::ZeroNotAllowed {
                var: Self::ENV_EMBEDDING_DIM,
            });
        }

        if self.sample_budget == 0 {
            return Err(ConfigError::ZeroNotAllowed {
                var: Self::ENV_SAMPLE_BUDGET,
            });
        }

        Ok(())
    }

    /// Bundle construction settings derived from this config.
    pub fn bundle_config(&self) -> BundleConfig {
        match self.embedding_backend {
            EmbedderBackendKind::Lexical => BundleConfig::lexical(),
            EmbedderBackendKind::Semantic => {
                let semantic = SemanticConfig {
                    model_path: self.semantic_model_path.clone().unwrap_or_default(),
                    embedding_dim: self.embedding_dim,
                    max_seq_len: SEMANTIC_MAX_SEQ_LEN,
                    testing_stub: false,
                };
                BundleConfig::semantic(semantic)
            }
        }
    }

    /// Explainer settings derived from this config.
    pub fn explainer_config(&self) -> ExplainerConfig {
        ExplainerConfig {
            sample_budget: self.sample_budget,
            ..Default::default()
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_backend_from_env(
        default: EmbedderBackendKind,
    ) -> Result<EmbedderBackendKind, ConfigError> {
        match env::var(Self::ENV_EMBEDDING_BACKEND) {
            Ok(value) => EmbedderBackendKind::from_str(&value)
                .map_err(|_| ConfigError::InvalidBackend { value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::NumberParseError {
                var: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }
}
