#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    ChatChoice, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    ModelCard, ModelList, NativeChatRequest, NativeChatResponse, NativeMessage, NativeUsage,
    ReadinessState, RequestBodyError, Usage, ValidationError,
};
pub use ports::{
    CoreError, EngineInitError, EngineLoader, EngineSpec, InferenceError, ModelAcquisitionError,
    ModelFetcher, ModelSource, NativeEngine,
};
pub use services::{
    EngineHandle, EngineSlot, Readiness, ReadinessController, StartupPlan, from_native_response,
    to_native_request,
};
pub use settings::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONTEXT_SIZE, DEFAULT_ENGINE_BASE_PORT, DEFAULT_HOST,
    DEFAULT_MODEL_FILENAME, DEFAULT_MODEL_REPO_ID, DEFAULT_PORT, DEFAULT_STARTUP_TIMEOUT, Settings,
    SettingsError,
};

// Re-export path utilities
pub use paths::{
    DEFAULT_MODELS_DIR, DirectoryCreationStrategy, MODELS_DIR_ENV, ModelsDirResolution,
    ModelsDirSource, PathError, ensure_directory, model_artifact_path, normalize_user_path,
    resolve_models_dir,
};

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
