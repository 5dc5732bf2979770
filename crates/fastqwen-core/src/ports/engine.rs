//! Native engine port.
//!
//! The engine is opaque: whatever computes completions (an in-process
//! library, a supervised child process) sits behind [`NativeEngine`].
//! [`EngineLoader`] turns an [`EngineSpec`] into a live engine.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NativeChatRequest, NativeChatResponse};

/// Parameters for loading an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSpec {
    /// Model artifact on disk.
    pub model_path: PathBuf,
    /// Context window in tokens.
    pub context_size: u32,
    /// Worker threads for generation.
    pub thread_count: usize,
    /// Prompt processing batch size.
    pub batch_size: u32,
    /// Name the engine reports the model under.
    pub model_alias: String,
}

/// The engine rejected the model or could not be brought up.
#[derive(Debug, Clone, Error)]
pub enum EngineInitError {
    /// Load parameters are out of range or the artifact is unusable.
    #[error("Invalid engine configuration: {0}")]
    InvalidSpec(String),

    /// The engine could not be started at all.
    #[error("Failed to start engine: {0}")]
    Spawn(String),

    /// The engine started but refused the model.
    #[error("Engine rejected model: {0}")]
    Rejected(String),

    /// The engine did not become healthy in time.
    #[error("Engine not ready after {0} seconds")]
    StartupTimeout(u64),
}

/// A single inference call failed.
///
/// Per-request only: the engine stays usable for later calls.
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    /// The engine refused this input (context overflow, malformed prompt).
    #[error("Engine rejected request: {0}")]
    Rejected(String),

    /// Internal engine fault while generating.
    #[error("Engine error: {0}")]
    Engine(String),

    /// The engine is gone (released, crashed, unreachable).
    #[error("Engine unavailable: {0}")]
    Unavailable(String),
}

/// The opaque inference engine.
///
/// Implementations need not be reentrant; callers serialize access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NativeEngine: Send + Sync {
    /// Run one chat completion to the end.
    async fn chat_completion(
        &self,
        request: NativeChatRequest,
    ) -> Result<NativeChatResponse, InferenceError>;

    /// Free engine resources. Called at most once.
    async fn release(&mut self);
}

/// Factory for [`NativeEngine`]s.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngineLoader: Send + Sync {
    async fn load(&self, spec: &EngineSpec) -> Result<Box<dyn NativeEngine>, EngineInitError>;
}
