//! HTTP health probing for the engine listener.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

/// Per-request timeout for a single health probe.
pub const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// One `GET {base_url}/health`. Any transport error or non-2xx is "not healthy".
pub async fn check_http_health(client: &Client, base_url: &str) -> bool {
    let url = format!("{base_url}/health");
    match client.get(&url).timeout(HEALTH_PROBE_TIMEOUT).send().await {
        Ok(response) if response.status().is_success() => true,
        Ok(response) => {
            debug!(target: "fastqwen.engine", status = %response.status(), "Engine not healthy yet");
            false
        }
        Err(e) => {
            debug!(target: "fastqwen.engine", error = %e, "Engine health probe failed");
            false
        }
    }
}
