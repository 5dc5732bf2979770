//! Composition root and serve loop for the gateway.
//!
//! `bootstrap` wires the concrete adapters (llama-server loader, Hugging Face
//! fetcher) behind the core ports. `serve` binds the router first so that
//! `/health` answers immediately, runs startup in the background, and on
//! shutdown releases the engine exactly once.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use fastqwen_core::{EngineSlot, ReadinessController, Settings, StartupPlan};
use fastqwen_runtime::{HfModelFetcher, LlamaServerConfig, LlamaServerLoader};

use crate::routes::create_router;

/// CORS configuration for the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins only.
    AllowOrigins(Vec<String>),
}

impl CorsConfig {
    /// `AllowAll` for an empty list, otherwise exactly those origins.
    pub fn from_origins(origins: &[String]) -> Self {
        if origins.is_empty() {
            Self::AllowAll
        } else {
            Self::AllowOrigins(origins.to_vec())
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

impl ServerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            cors: CorsConfig::from_origins(&settings.cors_origins),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// What handlers can see: the engine slot and nothing else.
#[derive(Debug, Clone)]
pub struct GatewayContext {
    slot: Arc<EngineSlot>,
}

impl GatewayContext {
    pub const fn new(slot: Arc<EngineSlot>) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &EngineSlot {
        &self.slot
    }
}

/// A wired gateway, ready to be served.
pub struct Gateway {
    pub config: ServerConfig,
    pub controller: ReadinessController,
    pub plan: StartupPlan,
}

/// Wire the production adapters from `settings`.
pub fn bootstrap(settings: &Settings) -> Result<Gateway> {
    settings.validate().context("invalid settings")?;
    let plan = StartupPlan::from_settings(settings)?;

    info!(
        target: "fastqwen.startup",
        models_dir = %settings.models_dir.display(),
        model = %settings.model_id(),
        repo = %settings.model_repo_id,
        llama_server = ?settings.llama_server_path,
        threads = settings.threads,
        ctx = settings.context_size,
        "Gateway bootstrap resolved settings"
    );

    let slot = Arc::new(EngineSlot::new(settings.model_id()));
    let fetcher = Arc::new(HfModelFetcher::new().with_progress(true));
    let loader = Arc::new(LlamaServerLoader::new(LlamaServerConfig {
        binary: settings.llama_server_path.clone(),
        base_port: settings.engine_base_port,
        startup_timeout: settings.startup_timeout,
    }));

    Ok(Gateway {
        config: ServerConfig::from_settings(settings),
        controller: ReadinessController::new(slot, fetcher, loader),
        plan,
    })
}

/// Bootstrap, bind, and serve until Ctrl-C/SIGTERM or a startup failure.
pub async fn start_server(settings: Settings) -> Result<()> {
    let gateway = bootstrap(&settings)?;
    let addr = gateway.config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    serve(listener, gateway, shutdown_signal()).await
}

/// Serve on `listener` while startup runs in the background.
///
/// Stops when `shutdown` resolves or startup fails. Either way the engine
/// slot is released after the listener has drained. A startup failure is
/// returned as the error.
pub async fn serve<F>(listener: TcpListener, gateway: Gateway, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let Gateway {
        config,
        controller,
        plan,
    } = gateway;
    let slot = Arc::clone(controller.slot());
    let app = create_router(GatewayContext::new(Arc::clone(&slot)), &config.cors);

    let addr = listener.local_addr()?;
    info!(target: "fastqwen.http", %addr, "Gateway listening");

    let startup_failed = CancellationToken::new();
    let startup = tokio::spawn({
        let token = startup_failed.clone();
        async move {
            let result = controller.start(plan).await;
            if result.is_err() {
                token.cancel();
            }
            result
        }
    });

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                () = shutdown => info!(target: "fastqwen.http", "Shutdown requested"),
                () = startup_failed.cancelled() => warn!(target: "fastqwen.http", "Stopping after failed startup"),
            }
        })
        .await;

    if !startup.is_finished() {
        startup.abort();
    }
    let outcome = match startup.await {
        Ok(result) => result.map_err(anyhow::Error::from),
        Err(e) if e.is_cancelled() => {
            info!(target: "fastqwen.startup", "Startup interrupted by shutdown");
            Ok(())
        }
        Err(e) => Err(anyhow!("startup task failed: {e}")),
    };

    slot.release().await;
    info!(target: "fastqwen.http", "Gateway stopped");

    outcome?;
    served.context("server error")?;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_from_origins() {
        assert_eq!(CorsConfig::from_origins(&[]), CorsConfig::AllowAll);
        let origins = vec!["http://localhost:3000".to_string()];
        assert_eq!(
            CorsConfig::from_origins(&origins),
            CorsConfig::AllowOrigins(origins)
        );
    }

    #[test]
    fn test_server_config_from_settings() {
        let mut settings = Settings::with_defaults(2);
        settings.host = "127.0.0.1".to_string();
        settings.port = 8123;
        let config = ServerConfig::from_settings(&settings);
        assert_eq!(config.bind_addr(), "127.0.0.1:8123");
        assert_eq!(config.cors, CorsConfig::AllowAll);
    }

    #[test]
    fn test_bootstrap_rejects_invalid_settings() {
        let settings = Settings::with_defaults(0);
        assert!(bootstrap(&settings).is_err());
    }

    #[tokio::test]
    async fn test_bootstrap_starts_uninitialized() {
        let settings = Settings::with_defaults(1);
        let gateway = bootstrap(&settings).unwrap();
        assert_eq!(
            gateway.controller.slot().state(),
            fastqwen_core::ReadinessState::Uninitialized
        );
        assert_eq!(gateway.controller.slot().model_id(), settings.model_id());
        assert_eq!(gateway.plan.engine.thread_count, 1);
    }
}
