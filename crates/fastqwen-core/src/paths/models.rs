//! Models directory resolution.

use std::env;
use std::path::{Component, Path, PathBuf};

use super::error::PathError;
use super::normalize::normalize_user_path;

/// Default models directory, relative to the working directory.
pub const DEFAULT_MODELS_DIR: &str = "./models";

/// Environment variable consulted when no explicit directory is given.
pub const MODELS_DIR_ENV: &str = "MODEL_DIR";

/// How the models directory was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelsDirSource {
    /// Passed by the caller (CLI flag).
    Explicit,
    /// Read from `MODEL_DIR`.
    EnvVar,
    /// Fell back to `./models`.
    Default,
}

#[derive(Debug, Clone)]
pub struct ModelsDirResolution {
    pub path: PathBuf,
    pub source: ModelsDirSource,
}

/// Resolve the models directory.
///
/// Order: explicit argument, then `MODEL_DIR`, then `./models`.
/// Blank values are treated as absent.
pub fn resolve_models_dir(explicit: Option<&str>) -> Result<ModelsDirResolution, PathError> {
    let from_env = env::var(MODELS_DIR_ENV).ok();
    resolve_from(explicit, from_env.as_deref())
}

fn resolve_from(
    explicit: Option<&str>,
    from_env: Option<&str>,
) -> Result<ModelsDirResolution, PathError> {
    let non_blank = |v: &&str| !v.trim().is_empty();

    let (raw, source) = if let Some(path) = explicit.filter(non_blank) {
        (path, ModelsDirSource::Explicit)
    } else if let Some(path) = from_env.filter(non_blank) {
        (path, ModelsDirSource::EnvVar)
    } else {
        (DEFAULT_MODELS_DIR, ModelsDirSource::Default)
    };

    Ok(ModelsDirResolution {
        path: normalize_user_path(raw)?,
        source,
    })
}

/// Location of `filename` inside `models_dir`.
///
/// `filename` must be a single path component.
pub fn model_artifact_path(models_dir: &Path, filename: &str) -> Result<PathBuf, PathError> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(models_dir.join(filename)),
        _ => Err(PathError::InvalidFilename(filename.to_string())),
    }
}
