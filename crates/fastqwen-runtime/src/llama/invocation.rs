//! `llama-server` command line construction.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use fastqwen_core::EngineSpec;

/// Address the engine listens on. Never exposed beyond loopback.
pub const ENGINE_HOST: &str = "127.0.0.1";

/// Builds the `llama-server` invocation for one model.
///
/// ```rust,ignore
/// let cmd = LlamaServerCommand::new("/usr/bin/llama-server", &spec)
///     .port(9000)
///     .arg("--metrics", None::<String>)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct LlamaServerCommand {
    binary_path: PathBuf,
    model_path: PathBuf,
    context_size: u32,
    threads: usize,
    batch_size: u32,
    alias: String,
    port: Option<u16>,
    extra_args: Vec<(String, Option<String>)>,
}

impl LlamaServerCommand {
    pub fn new(binary_path: impl Into<PathBuf>, spec: &EngineSpec) -> Self {
        Self {
            binary_path: binary_path.into(),
            model_path: spec.model_path.clone(),
            context_size: spec.context_size,
            threads: spec.thread_count,
            batch_size: spec.batch_size,
            alias: spec.model_alias.clone(),
            port: None,
            extra_args: Vec::new(),
        }
    }

    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Append a flag, with an optional value, after the standard ones.
    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.extra_args.push((key.into(), value.map(Into::into)));
        self
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Arguments in the order they will be passed.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            self.model_path.to_string_lossy().into_owned(),
            "-c".to_string(),
            self.context_size.to_string(),
            "-t".to_string(),
            self.threads.to_string(),
            "-b".to_string(),
            self.batch_size.to_string(),
            "--host".to_string(),
            ENGINE_HOST.to_string(),
        ];
        if let Some(port) = self.port {
            args.push("--port".to_string());
            args.push(port.to_string());
        }
        if !self.alias.is_empty() {
            args.push("--alias".to_string());
            args.push(self.alias.clone());
        }
        for (key, value) in &self.extra_args {
            args.push(key.clone());
            if let Some(value) = value {
                args.push(value.clone());
            }
        }
        args
    }

    pub fn build(&self) -> Command {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(self.args());
        cmd
    }
}
