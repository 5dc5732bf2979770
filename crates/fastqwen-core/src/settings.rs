//! Runtime settings for the gateway and its collaborators.
//!
//! Pure data plus validation. Adapters decide where values come from
//! (CLI flags, environment, `.env`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::paths::{DEFAULT_MODELS_DIR, PathError, model_artifact_path};
use crate::ports::{EngineSpec, ModelSource};

/// Default bind address for the HTTP gateway.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default port for the HTTP gateway.
pub const DEFAULT_PORT: u16 = 8001;

/// Hugging Face repository holding the default model.
pub const DEFAULT_MODEL_REPO_ID: &str = "Qwen/Qwen2.5-0.5B-Instruct-GGUF";

/// File fetched from [`DEFAULT_MODEL_REPO_ID`] and served.
pub const DEFAULT_MODEL_FILENAME: &str = "qwen2.5-0.5b-instruct-q8_0.gguf";

/// Default engine context window, in tokens.
pub const DEFAULT_CONTEXT_SIZE: u32 = 4096;

/// Default prompt batch size.
pub const DEFAULT_BATCH_SIZE: u32 = 512;

/// First port tried for the engine's private listener.
pub const DEFAULT_ENGINE_BASE_PORT: u16 = 9000;

/// How long the engine may take to become healthy.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(300);

/// Everything needed to fetch, load and serve the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub model_repo_id: String,
    pub model_filename: String,
    pub models_dir: PathBuf,
    pub context_size: u32,
    pub threads: usize,
    pub batch_size: u32,
    /// Explicit engine binary; `None` means look it up on `PATH`.
    pub llama_server_path: Option<PathBuf>,
    pub engine_base_port: u16,
    pub startup_timeout: Duration,
    #[serde(skip_serializing)]
    pub hf_token: Option<String>,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Defaults for everything, with `threads` supplied by the caller
    /// (usually the number of available processing units).
    #[must_use]
    pub fn with_defaults(threads: usize) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_repo_id: DEFAULT_MODEL_REPO_ID.to_string(),
            model_filename: DEFAULT_MODEL_FILENAME.to_string(),
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            context_size: DEFAULT_CONTEXT_SIZE,
            threads,
            batch_size: DEFAULT_BATCH_SIZE,
            llama_server_path: None,
            engine_base_port: DEFAULT_ENGINE_BASE_PORT,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            hf_token: None,
            cors_origins: Vec::new(),
        }
    }

    /// The id the model is advertised under (`/health`, `/v1/models`).
    pub fn model_id(&self) -> &str {
        &self.model_filename
    }

    /// Where the artifact lives (or will live once fetched).
    pub fn model_path(&self) -> Result<PathBuf, PathError> {
        model_artifact_path(&self.models_dir, &self.model_filename)
    }

    pub fn model_source(&self) -> ModelSource {
        ModelSource {
            repo_id: self.model_repo_id.clone(),
            filename: self.model_filename.clone(),
            token: self.hf_token.clone(),
        }
    }

    /// Load parameters for an artifact at `model_path`.
    pub fn engine_spec(&self, model_path: &Path) -> EngineSpec {
        EngineSpec {
            model_path: model_path.to_path_buf(),
            context_size: self.context_size,
            thread_count: self.threads,
            batch_size: self.batch_size,
            model_alias: self.model_id().to_string(),
        }
    }

    /// Check every field, reporting the first problem found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.host.trim().is_empty() {
            return Err(SettingsError::EmptyField("host"));
        }
        if self.port == 0 {
            return Err(SettingsError::InvalidPort(self.port));
        }
        if self.model_repo_id.trim().is_empty() {
            return Err(SettingsError::EmptyField("model_repo_id"));
        }
        if self.model_filename.trim().is_empty() {
            return Err(SettingsError::EmptyField("model_filename"));
        }
        if self.context_size == 0 {
            return Err(SettingsError::InvalidContextSize(self.context_size));
        }
        if self.threads == 0 {
            return Err(SettingsError::InvalidThreadCount(self.threads));
        }
        if self.batch_size == 0 {
            return Err(SettingsError::InvalidBatchSize(self.batch_size));
        }
        if self.startup_timeout.is_zero() {
            return Err(SettingsError::InvalidStartupTimeout);
        }
        self.model_path()?;
        Ok(())
    }
}

/// Settings validation error.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Port must be non-zero, got {0}")]
    InvalidPort(u16),

    #[error("Context size must be at least 1, got {0}")]
    InvalidContextSize(u32),

    #[error("Thread count must be at least 1, got {0}")]
    InvalidThreadCount(usize),

    #[error("Batch size must be at least 1, got {0}")]
    InvalidBatchSize(u32),

    #[error("Startup timeout must be positive")]
    InvalidStartupTimeout,

    #[error(transparent)]
    Path(#[from] PathError),
}
