//! Download-if-absent from the Hugging Face Hub.
//!
//! The hub client keeps its own cache under `<models_dir>/.cache`; the
//! requested file is then moved (or copied) to `<models_dir>/<filename>`,
//! which is the path the engine loads from.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hf_hub::api::sync::{Api, ApiBuilder};
use hf_hub::{Repo, RepoType};
use tracing::{debug, info};

use fastqwen_core::{
    DirectoryCreationStrategy, ModelAcquisitionError, ModelFetcher, ModelSource, ensure_directory,
    model_artifact_path,
};

/// Hub cache directory, relative to the models directory.
pub const HF_CACHE_DIR: &str = ".cache";

const DEFAULT_REVISION: &str = "main";

#[derive(Debug, Clone)]
pub struct HfModelFetcher {
    show_progress: bool,
}

impl Default for HfModelFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HfModelFetcher {
    pub const fn new() -> Self {
        Self {
            show_progress: false,
        }
    }

    /// Show the hub client's terminal progress bar while downloading.
    #[must_use]
    pub const fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn build_api(&self, token: Option<String>, models_dir: &Path) -> Result<Api, String> {
        ApiBuilder::new()
            .with_token(token)
            .with_cache_dir(models_dir.join(HF_CACHE_DIR))
            .with_progress(self.show_progress)
            .build()
            .map_err(|e| format!("failed to create Hugging Face client: {e}"))
    }

    /// Blocking: resolve `source` through the hub cache and return the cached path.
    fn download_blocking(&self, source: &ModelSource, models_dir: &Path) -> Result<PathBuf, String> {
        let api = self.build_api(source.token.clone(), models_dir)?;
        let repo = api.repo(Repo::with_revision(
            source.repo_id.clone(),
            RepoType::Model,
            DEFAULT_REVISION.to_string(),
        ));
        repo.get(&source.filename).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ModelFetcher for HfModelFetcher {
    async fn fetch(
        &self,
        source: &ModelSource,
        dest_dir: &Path,
    ) -> Result<PathBuf, ModelAcquisitionError> {
        let target = model_artifact_path(dest_dir, &source.filename)
            .map_err(|e| ModelAcquisitionError::Directory(e.to_string()))?;

        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            debug!(target: "fastqwen.startup", path = %target.display(), "Artifact already present");
            verify_artifact(&target).await?;
            return Ok(target);
        }

        info!(
            target: "fastqwen.startup",
            repo = %source.repo_id,
            file = %source.filename,
            "Downloading model from Hugging Face"
        );
        let download_error = |reason: String| ModelAcquisitionError::Download {
            repo_id: source.repo_id.clone(),
            filename: source.filename.clone(),
            reason,
        };

        let fetcher = self.clone();
        let owned_source = source.clone();
        let models_dir = dest_dir.to_path_buf();
        let cached = tokio::task::spawn_blocking(move || {
            ensure_directory(&models_dir, DirectoryCreationStrategy::AutoCreate)
                .map_err(|e| ModelAcquisitionError::Directory(e.to_string()))?;
            fetcher
                .download_blocking(&owned_source, &models_dir)
                .map_err(|reason| ModelAcquisitionError::Download {
                    repo_id: owned_source.repo_id.clone(),
                    filename: owned_source.filename.clone(),
                    reason,
                })
        })
        .await
        .map_err(|e| download_error(format!("download task failed: {e}")))??;

        place_artifact(&cached, &target)
            .await
            .map_err(|e| ModelAcquisitionError::Unreadable {
                path: target.clone(),
                reason: e.to_string(),
            })?;
        verify_artifact(&target).await?;

        info!(target: "fastqwen.startup", path = %target.display(), "Model downloaded");
        Ok(target)
    }
}

/// Move the cached blob into place, copying when a rename is not possible.
async fn place_artifact(cached: &Path, target: &Path) -> io::Result<()> {
    let blob = tokio::fs::canonicalize(cached).await?;
    if tokio::fs::rename(&blob, target).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(&blob, target).await.map(|_| ())
}

/// The artifact must be a non-empty, readable regular file.
async fn verify_artifact(path: &Path) -> Result<(), ModelAcquisitionError> {
    let unreadable = |reason: String| ModelAcquisitionError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| unreadable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(unreadable("not a regular file".to_string()));
    }
    if metadata.len() == 0 {
        return Err(unreadable("file is empty".to_string()));
    }
    tokio::fs::File::open(path)
        .await
        .map_err(|e| unreadable(e.to_string()))?;
    Ok(())
}
