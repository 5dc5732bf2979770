//! Creating the models directory and checking it can hold downloads.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::error::PathError;

/// What to do when the directory is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryCreationStrategy {
    /// Create it and any parents.
    #[default]
    AutoCreate,
    /// Fail with `DirectoryNotFound`.
    Disallow,
}

/// Make sure `path` is an existing, writable directory.
pub fn ensure_directory(path: &Path, strategy: DirectoryCreationStrategy) -> Result<(), PathError> {
    match (path.exists(), strategy) {
        (true, _) if !path.is_dir() => return Err(PathError::NotADirectory(path.to_path_buf())),
        (true, _) => {}
        (false, DirectoryCreationStrategy::Disallow) => {
            return Err(PathError::DirectoryNotFound(path.to_path_buf()));
        }
        (false, DirectoryCreationStrategy::AutoCreate) => {
            fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
    }

    verify_writable(path)
}

/// Probe writability by creating and removing a scratch file.
pub fn verify_writable(path: &Path) -> Result<(), PathError> {
    let probe = path.join(".fastqwen_write_probe");
    let not_writable = |e: std::io::Error| PathError::NotWritable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&probe)
        .map_err(not_writable)?;
    file.write_all(b"ok").map_err(not_writable)?;
    drop(file);
    let _ = fs::remove_file(&probe);
    Ok(())
}
