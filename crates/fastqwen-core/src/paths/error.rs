//! Path-related error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from path resolution and directory handling.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot determine home directory")]
    NoHomeDir,

    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    #[error("Directory {0} does not exist")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    #[error("Directory {path} is not writable: {reason}")]
    NotWritable { path: PathBuf, reason: String },

    #[error("Path cannot be empty")]
    EmptyPath,

    /// A model filename contained a separator or parent reference.
    #[error("Model filename must be a bare file name, got {0:?}")]
    InvalidFilename(String),

    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),
}
