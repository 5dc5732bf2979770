//! Port definitions (trait abstractions) for external systems.
//!
//! The core expects two collaborators from infrastructure: something that
//! loads and runs the native engine, and something that fetches the model
//! artifact. Both are described here using only domain types.

pub mod engine;
pub mod fetcher;

use thiserror::Error;

pub use engine::{EngineInitError, EngineLoader, EngineSpec, InferenceError, NativeEngine};
pub use fetcher::{ModelAcquisitionError, ModelFetcher, ModelSource};

#[cfg(test)]
pub use engine::{MockEngineLoader, MockNativeEngine};
#[cfg(test)]
pub use fetcher::MockModelFetcher;

use crate::domain::ReadinessState;

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (HTTP status codes,
/// CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// The model artifact could not be made available.
    #[error(transparent)]
    Acquisition(#[from] ModelAcquisitionError),

    /// The engine refused to load.
    #[error(transparent)]
    EngineInit(#[from] EngineInitError),

    /// A single inference call failed.
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// Invalid settings.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Path resolution failed.
    #[error(transparent)]
    Path(#[from] crate::paths::PathError),

    /// The engine is not ready to serve.
    #[error("Model is still loading")]
    NotReady(ReadinessState),

    /// A readiness transition was attempted out of order.
    #[error("Invalid readiness transition: {from} -> {to}")]
    InvalidTransition {
        from: ReadinessState,
        to: ReadinessState,
    },

    /// Startup was requested more than once.
    #[error("Startup already ran (state: {0})")]
    AlreadyStarted(ReadinessState),
}
