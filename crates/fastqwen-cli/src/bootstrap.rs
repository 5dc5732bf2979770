//! Turn parsed arguments into validated [`Settings`].

use std::time::Duration;

use tracing::debug;

use fastqwen_core::{Settings, normalize_user_path, resolve_models_dir};
use fastqwen_runtime::available_threads;

use crate::commands::{ModelArgs, ServeArgs};
use crate::error::CliError;

/// Settings for commands that only touch the artifact.
pub fn model_settings(args: &ModelArgs) -> Result<Settings, CliError> {
    let mut settings = Settings::with_defaults(available_threads());
    apply_model_args(&mut settings, args)?;
    Ok(settings)
}

/// Settings for `serve`, validated.
pub fn serve_settings(args: &ServeArgs) -> Result<Settings, CliError> {
    let mut settings = Settings::with_defaults(args.threads.unwrap_or_else(available_threads));
    apply_model_args(&mut settings, &args.model)?;

    settings.host.clone_from(&args.host);
    settings.port = args.port;
    settings.context_size = args.ctx_size;
    settings.batch_size = args.batch_size;
    settings.engine_base_port = args.engine_base_port;
    settings.startup_timeout = Duration::from_secs(args.startup_timeout);
    settings.cors_origins = args
        .cors_origins
        .iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    settings.llama_server_path = match &args.llama_server {
        Some(path) => Some(normalize_user_path(&path.to_string_lossy())?),
        None => None,
    };

    settings.validate()?;
    Ok(settings)
}

fn apply_model_args(settings: &mut Settings, args: &ModelArgs) -> Result<(), CliError> {
    let resolved = resolve_models_dir(args.models_dir.as_deref())?;
    debug!(
        path = %resolved.path.display(),
        source = ?resolved.source,
        "Resolved models directory"
    );
    settings.models_dir = resolved.path;
    settings.model_repo_id.clone_from(&args.repo_id);
    settings.model_filename.clone_from(&args.filename);
    settings.hf_token = args
        .hf_token
        .as_ref()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    Ok(())
}
