//! Exclusive owner of the loaded native engine.
//!
//! Every inference call goes through one `tokio::sync::Mutex`, which is
//! fair: callers are admitted in the order they started waiting. The lock is
//! held for the native call only. Release takes the same lock, so it waits
//! for the call in progress to finish.

use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{NativeChatRequest, NativeChatResponse};
use crate::ports::{EngineInitError, EngineLoader, EngineSpec, InferenceError, NativeEngine};

pub struct EngineHandle {
    engine: Mutex<Option<Box<dyn NativeEngine>>>,
    spec: EngineSpec,
    released: AtomicBool,
    invocations: AtomicU64,
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("spec", &self.spec)
            .field("released", &self.released.load(Ordering::Acquire))
            .field("invocations", &self.invocations())
            .finish_non_exhaustive()
    }
}

impl EngineHandle {
    /// Validate `spec`, then load an engine through `loader`.
    pub async fn acquire(
        loader: &dyn EngineLoader,
        spec: EngineSpec,
    ) -> Result<Self, EngineInitError> {
        check_spec(&spec).await?;
        info!(
            target: "fastqwen.engine",
            model = %spec.model_path.display(),
            ctx = spec.context_size,
            threads = spec.thread_count,
            batch = spec.batch_size,
            "Loading engine"
        );
        let engine = loader.load(&spec).await?;
        Ok(Self::from_engine(engine, spec))
    }

    /// Wrap an engine that is already loaded.
    pub fn from_engine(engine: Box<dyn NativeEngine>, spec: EngineSpec) -> Self {
        Self {
            engine: Mutex::new(Some(engine)),
            spec,
            released: AtomicBool::new(false),
            invocations: AtomicU64::new(0),
        }
    }

    pub const fn spec(&self) -> &EngineSpec {
        &self.spec
    }

    /// Non-blocking: true until [`release`](Self::release) has run.
    pub fn is_ready(&self) -> bool {
        !self.released.load(Ordering::Acquire)
    }

    /// Number of calls that reached the engine.
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    /// Run one completion with exclusive access to the engine.
    pub async fn infer(
        &self,
        request: NativeChatRequest,
    ) -> Result<NativeChatResponse, InferenceError> {
        let guard = self.engine.lock().await;
        let Some(engine) = guard.as_ref() else {
            return Err(InferenceError::Unavailable(
                "engine has been released".to_string(),
            ));
        };

        let n = self.invocations.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(target: "fastqwen.engine", invocation = n, "Entering engine");
        let result = engine.chat_completion(request).await;
        debug!(
            target: "fastqwen.engine",
            invocation = n,
            ok = result.is_ok(),
            "Leaving engine"
        );
        result
    }

    /// Tear the engine down. Returns `false` if it was already released.
    pub async fn release(&self) -> bool {
        let mut guard = self.engine.lock().await;
        let Some(mut engine) = guard.take() else {
            return false;
        };
        self.released.store(true, Ordering::Release);
        engine.release().await;
        info!(
            target: "fastqwen.engine",
            invocations = self.invocations(),
            "Engine released"
        );
        true
    }
}

async fn check_spec(spec: &EngineSpec) -> Result<(), EngineInitError> {
    if spec.thread_count == 0 {
        return Err(EngineInitError::InvalidSpec(
            "thread count must be at least 1".to_string(),
        ));
    }
    if spec.context_size == 0 {
        return Err(EngineInitError::InvalidSpec(
            "context size must be positive".to_string(),
        ));
    }
    if spec.batch_size == 0 {
        return Err(EngineInitError::InvalidSpec(
            "batch size must be positive".to_string(),
        ));
    }

    let path = &spec.model_path;
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        let what = if e.kind() == ErrorKind::NotFound {
            "does not exist".to_string()
        } else {
            e.to_string()
        };
        EngineInitError::InvalidSpec(format!("model {}: {what}", path.display()))
    })?;
    if !metadata.is_file() {
        return Err(EngineInitError::InvalidSpec(format!(
            "model {} is not a regular file",
            path.display()
        )));
    }
    tokio::fs::File::open(path).await.map_err(|e| {
        EngineInitError::InvalidSpec(format!("model {} is unreadable: {e}", path.display()))
    })?;
    Ok(())
}
