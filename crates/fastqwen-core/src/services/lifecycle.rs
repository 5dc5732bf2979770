//! Startup orchestration.
//!
//! `Uninitialized -> Loading`, make sure the artifact is on disk, load the
//! engine, install it, `-> Ready`. Any failure ends in `Failed`, which is
//! terminal.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::engine_handle::EngineHandle;
use super::slot::EngineSlot;
use crate::ports::{CoreError, EngineLoader, EngineSpec, ModelFetcher, ModelSource};
use crate::settings::{Settings, SettingsError};

/// What startup needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupPlan {
    pub source: ModelSource,
    pub models_dir: PathBuf,
    /// Load parameters; `engine.model_path` is the expected artifact location.
    pub engine: EngineSpec,
}

impl StartupPlan {
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let model_path = settings.model_path()?;
        Ok(Self {
            source: settings.model_source(),
            models_dir: settings.models_dir.clone(),
            engine: settings.engine_spec(&model_path),
        })
    }
}

/// Drives a single [`EngineSlot`] from `Uninitialized` to `Ready` or `Failed`.
#[derive(Clone)]
pub struct ReadinessController {
    slot: Arc<EngineSlot>,
    fetcher: Arc<dyn ModelFetcher>,
    loader: Arc<dyn EngineLoader>,
}

impl ReadinessController {
    pub fn new(
        slot: Arc<EngineSlot>,
        fetcher: Arc<dyn ModelFetcher>,
        loader: Arc<dyn EngineLoader>,
    ) -> Self {
        Self {
            slot,
            fetcher,
            loader,
        }
    }

    pub fn slot(&self) -> &Arc<EngineSlot> {
        &self.slot
    }

    /// Run startup. Only the first call does anything; later calls get
    /// `AlreadyStarted`.
    pub async fn start(&self, plan: StartupPlan) -> Result<(), CoreError> {
        self.slot.begin_loading()?;
        info!(
            target: "fastqwen.startup",
            repo = %plan.source.repo_id,
            file = %plan.source.filename,
            "Starting engine"
        );

        match self.acquire(plan).await {
            Ok(handle) => {
                self.slot.install(handle)?;
                info!(target: "fastqwen.startup", model = %self.slot.model_id(), "Engine ready");
                Ok(())
            }
            Err(e) => {
                self.slot.fail();
                error!(target: "fastqwen.startup", error = %e, "Startup failed");
                Err(e)
            }
        }
    }

    async fn acquire(&self, plan: StartupPlan) -> Result<EngineHandle, CoreError> {
        let StartupPlan {
            source,
            models_dir,
            mut engine,
        } = plan;

        let present = tokio::fs::try_exists(&engine.model_path)
            .await
            .unwrap_or(false);
        if present {
            info!(target: "fastqwen.startup", path = %engine.model_path.display(), "Model artifact present");
        } else {
            info!(target: "fastqwen.startup", dir = %models_dir.display(), "Model artifact missing, fetching");
            let fetched = self.fetcher.fetch(&source, &models_dir).await?;
            if fetched != engine.model_path {
                warn!(
                    target: "fastqwen.startup",
                    expected = %engine.model_path.display(),
                    actual = %fetched.display(),
                    "Fetcher returned a different path"
                );
                engine.model_path = fetched;
            }
        }

        Ok(EngineHandle::acquire(self.loader.as_ref(), engine).await?)
    }
}
