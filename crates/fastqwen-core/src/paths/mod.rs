//! Filesystem locations used by fastqwen.
//!
//! - where model artifacts live (`models_dir`)
//! - the artifact path for a given filename
//! - creating and checking directories
//!
//! No interactive I/O here; adapters decide what to tell the user.

mod ensure;
mod error;
mod models;
mod normalize;

pub use error::PathError;

pub use models::{
    DEFAULT_MODELS_DIR, MODELS_DIR_ENV, ModelsDirResolution, ModelsDirSource, model_artifact_path,
    resolve_models_dir,
};

pub use ensure::{DirectoryCreationStrategy, ensure_directory, verify_writable};

pub use normalize::normalize_user_path;
