//! Spawns and supervises `llama-server` as the native engine.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::process::Child;
use tokio::time::{Instant, sleep};
use tracing::{info, warn};

use fastqwen_core::{EngineInitError, EngineLoader, EngineSpec, NativeEngine};

use super::engine::LlamaServerEngine;
use super::invocation::{ENGINE_HOST, LlamaServerCommand};
use crate::health::check_http_health;
use crate::process::{allocate_port, forward_child_output, shutdown_child};

/// Binary looked up on `PATH` when no explicit path is configured.
pub const LLAMA_SERVER_BINARY: &str = "llama-server";

const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for [`LlamaServerLoader`].
#[derive(Debug, Clone)]
pub struct LlamaServerConfig {
    /// Explicit binary path; `None` searches `PATH`.
    pub binary: Option<PathBuf>,
    /// First port tried for the engine listener.
    pub base_port: u16,
    /// How long the engine may take to answer `/health` with 200.
    pub startup_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LlamaServerLoader {
    config: LlamaServerConfig,
    client: Client,
}

impl LlamaServerLoader {
    pub fn new(config: LlamaServerConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// The binary that will be spawned.
    pub fn resolve_binary(&self) -> Result<PathBuf, EngineInitError> {
        match &self.config.binary {
            Some(path) if path.is_file() => Ok(path.clone()),
            Some(path) => Err(EngineInitError::Spawn(format!(
                "llama-server not found at {}",
                path.display()
            ))),
            None => which::which(LLAMA_SERVER_BINARY).map_err(|e| {
                EngineInitError::Spawn(format!("{LLAMA_SERVER_BINARY} not found on PATH: {e}"))
            }),
        }
    }

    /// Poll `/health` until it answers 200, the child exits, or time runs out.
    async fn wait_until_healthy(
        &self,
        child: &mut Child,
        base_url: &str,
    ) -> Result<(), EngineInitError> {
        let timeout = self.config.startup_timeout;
        let deadline = Instant::now() + timeout;

        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    return Err(EngineInitError::Rejected(format!(
                        "llama-server exited during startup ({status})"
                    )));
                }
                Ok(None) => {}
                Err(e) => return Err(EngineInitError::Spawn(e.to_string())),
            }

            if check_http_health(&self.client, base_url).await {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(EngineInitError::StartupTimeout(timeout.as_secs()));
            }
            sleep(HEALTH_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl EngineLoader for LlamaServerLoader {
    async fn load(&self, spec: &EngineSpec) -> Result<Box<dyn NativeEngine>, EngineInitError> {
        let binary = self.resolve_binary()?;
        let port = allocate_port(self.config.base_port, &[])
            .map_err(|e| EngineInitError::Spawn(e.to_string()))?;

        let command = LlamaServerCommand::new(&binary, spec).port(port);
        info!(
            target: "fastqwen.engine",
            binary = %binary.display(),
            args = %command.args().join(" "),
            "Spawning llama-server"
        );

        let mut cmd = command.build();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let mut child = cmd
            .spawn()
            .map_err(|e| EngineInitError::Spawn(format!("{}: {e}", binary.display())))?;
        forward_child_output(&mut child, port);

        let base_url = format!("http://{ENGINE_HOST}:{port}");
        if let Err(e) = self.wait_until_healthy(&mut child, &base_url).await {
            if let Err(stop_err) = shutdown_child(&mut child).await {
                warn!(target: "fastqwen.engine", error = %stop_err, "Failed to stop llama-server");
            }
            return Err(e);
        }

        info!(target: "fastqwen.engine", %base_url, pid = ?child.id(), "llama-server ready");
        Ok(Box::new(LlamaServerEngine::attach(
            self.client.clone(),
            base_url,
            spec.model_alias.clone(),
            Some(child),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> EngineSpec {
        EngineSpec {
            model_path: PathBuf::from("/models/none.gguf"),
            context_size: 128,
            thread_count: 1,
            batch_size: 8,
            model_alias: "none.gguf".to_string(),
        }
    }

    fn loader(binary: Option<PathBuf>, timeout: Duration) -> LlamaServerLoader {
        LlamaServerLoader::new(LlamaServerConfig {
            binary,
            base_port: 39_000,
            startup_timeout: timeout,
        })
    }

    #[tokio::test]
    async fn test_missing_explicit_binary() {
        let loader = loader(
            Some(PathBuf::from("/definitely/not/llama-server")),
            Duration::from_secs(1),
        );
        let err = loader.load(&spec()).await.err().expect("load should fail");
        assert!(matches!(err, EngineInitError::Spawn(m) if m.contains("not found")));
    }

    #[cfg(unix)]
    fn script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.path().join("llama-server");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_early_exit_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let binary = script(&dir, "echo 'failed to load model' >&2; exit 1");
        let loader = loader(Some(binary), Duration::from_secs(30));

        let err = loader.load(&spec()).await.err().expect("load should fail");
        assert!(matches!(err, EngineInitError::Rejected(m) if m.contains("exited")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_never_healthy_times_out() {
        let dir = tempfile::TempDir::new().unwrap();
        let binary = script(&dir, "exec sleep 30");
        let loader = loader(Some(binary), Duration::from_millis(1500));

        let err = loader.load(&spec()).await.err().expect("load should fail");
        assert!(matches!(err, EngineInitError::StartupTimeout(_)));
    }
}
