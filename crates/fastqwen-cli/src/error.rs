//! CLI error type and exit-code mapping.

use fastqwen_core::{CoreError, EngineInitError, ModelAcquisitionError, PathError, SettingsError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CliError {
    /// The model artifact could not be obtained.
    #[error("Model acquisition failed: {0}")]
    Acquisition(String),

    /// The engine could not be started.
    #[error("Engine failed to start: {0}")]
    EngineInit(String),

    /// The gateway never reported ready.
    #[error("Gateway not ready: {0}")]
    NotReady(String),

    #[error("Benchmark failed: {0}")]
    Bench(String),

    #[error("Invalid arguments: {0}")]
    Arguments(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Exit code, following sysexits.h where one fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Acquisition(_) | Self::NotReady(_) => 69, // EX_UNAVAILABLE
            Self::EngineInit(_) => 70,                      // EX_SOFTWARE
            Self::Arguments(_) => 2,                        // EX_USAGE
            Self::Io(_) => 74,                              // EX_IOERR
            Self::Config(_) => 78,                          // EX_CONFIG
            Self::Bench(_) | Self::Other(_) => 1,
        }
    }

    /// Classify an error coming out of a handler by walking its cause chain.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<Self>() {
                return e.clone();
            }
            if let Some(e) = cause.downcast_ref::<CoreError>() {
                return Self::from_core(e);
            }
            if let Some(e) = cause.downcast_ref::<ModelAcquisitionError>() {
                return Self::Acquisition(e.to_string());
            }
            if let Some(e) = cause.downcast_ref::<EngineInitError>() {
                return Self::EngineInit(e.to_string());
            }
            if cause.is::<SettingsError>() || cause.is::<PathError>() {
                return Self::Config(cause.to_string());
            }
            if cause.is::<std::io::Error>() {
                return Self::Io(format!("{err:#}"));
            }
        }
        Self::Other(format!("{err:#}"))
    }

    fn from_core(err: &CoreError) -> Self {
        match err {
            CoreError::Acquisition(e) => Self::Acquisition(e.to_string()),
            CoreError::EngineInit(e) => Self::EngineInit(e.to_string()),
            CoreError::Settings(_) | CoreError::Path(_) => Self::Config(err.to_string()),
            _ => Self::Other(err.to_string()),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::from_core(&err)
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
