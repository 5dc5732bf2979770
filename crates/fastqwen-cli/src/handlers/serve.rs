//! `fastqwen serve`.

use anyhow::Result;
use tracing::info;

use crate::bootstrap::serve_settings;
use crate::commands::ServeArgs;

/// Run the gateway until Ctrl-C/SIGTERM or a startup failure.
pub async fn execute(args: &ServeArgs) -> Result<()> {
    let settings = serve_settings(args)?;

    info!(
        host = %settings.host,
        port = settings.port,
        model = %settings.model_id(),
        "Starting fastqwen gateway"
    );
    println!();
    println!("  fastqwen gateway starting...");
    println!();
    println!("  Model:  {}", settings.model_id());
    println!("  API:    http://{}:{}/v1", settings.host, settings.port);
    println!("  Health: http://{}:{}/health", settings.host, settings.port);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    fastqwen_axum::start_server(settings).await
}
