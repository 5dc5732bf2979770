//! Model artifact fetcher port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Where to get the model from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    /// Remote repository id, e.g. `Qwen/Qwen2.5-0.5B-Instruct-GGUF`.
    pub repo_id: String,
    /// File inside the repository; also the local file name.
    pub filename: String,
    /// Access token for gated or private repositories.
    pub token: Option<String>,
}

/// The artifact could not be made available locally.
#[derive(Debug, Clone, Error)]
pub enum ModelAcquisitionError {
    #[error("Failed to download {filename} from {repo_id}: {reason}")]
    Download {
        repo_id: String,
        filename: String,
        reason: String,
    },

    #[error("Model artifact {path} is unreadable: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Cannot prepare models directory: {0}")]
    Directory(String),
}

/// Download-if-absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelFetcher: Send + Sync {
    /// Ensure `dest_dir/<source.filename>` exists and return its path.
    ///
    /// Idempotent: when the file is already there it is returned without
    /// touching the network.
    async fn fetch(
        &self,
        source: &ModelSource,
        dest_dir: &Path,
    ) -> Result<PathBuf, ModelAcquisitionError>;
}
