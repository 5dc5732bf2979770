//! HTTP side of the benchmark: readiness polling and the timed request.

use std::time::{Duration, Instant};

use fastqwen_core::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::report::{BenchOutcome, BenchmarkReport};

/// Where `fastqwen serve` listens by default.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub const DEFAULT_MAX_TOKENS: u32 = 100;

pub const BENCH_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const BENCH_USER_PROMPT: &str = "Write a short poem about coding in Python.";

const BENCH_TEMPERATURE: f32 = 0.7;

/// Per-probe timeout so a wedged gateway cannot stall readiness polling.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Invalid gateway URL '{0}': expected http:// or https://")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The fixed benchmark request.
pub fn benchmark_request(max_tokens: u32) -> ChatCompletionRequest {
    ChatCompletionRequest::new(vec![
        ChatMessage::system(BENCH_SYSTEM_PROMPT),
        ChatMessage::user(BENCH_USER_PROMPT),
    ])
    .with_max_tokens(max_tokens)
    .with_temperature(BENCH_TEMPERATURE)
}

/// Talks to one gateway over HTTP.
#[derive(Debug, Clone)]
pub struct BenchClient {
    http: Client,
    base_url: String,
    poll_interval: Duration,
    max_tokens: u32,
}

impl BenchClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BenchError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(BenchError::InvalidUrl(base_url));
        }
        Ok(Self {
            http: Client::builder().build()?,
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Poll `/health` until it answers 200 or `timeout` elapses.
    ///
    /// Never errors: refused connections and 503s both mean "not yet".
    pub async fn wait_for_ready(&self, timeout: Duration) -> bool {
        let url = format!("{}/health", self.base_url);
        let started = Instant::now();
        info!(target: "fastqwen.bench", %url, timeout_secs = timeout.as_secs(), "Waiting for gateway");

        loop {
            match self.http.get(&url).timeout(PROBE_TIMEOUT).send().await {
                Ok(response) if response.status() == StatusCode::OK => {
                    info!(
                        target: "fastqwen.bench",
                        waited_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                        "Gateway is ready"
                    );
                    return true;
                }
                Ok(response) => {
                    debug!(target: "fastqwen.bench", status = %response.status(), "Gateway not ready");
                }
                Err(e) => {
                    debug!(target: "fastqwen.bench", error = %e, "Gateway unreachable");
                }
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                warn!(target: "fastqwen.bench", "Gateway did not become ready in time");
                return false;
            }
            tokio::time::sleep(self.poll_interval.min(timeout - elapsed)).await;
        }
    }

    /// Send the fixed request once and time it.
    pub async fn run_single_benchmark(&self) -> BenchOutcome {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = benchmark_request(self.max_tokens);

        info!(target: "fastqwen.bench", %url, max_tokens = self.max_tokens, "Sending benchmark request");
        let started = Instant::now();
        let outcome = match self.http.post(&url).json(&request).send().await {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(body) => {
                        let duration = started.elapsed();
                        outcome_from_body(status, &body, duration)
                    }
                    Err(e) => BenchOutcome::Failed(format!("failed to read response body: {e}")),
                }
            }
            Err(e) => BenchOutcome::Failed(format!("request failed: {e}")),
        };

        match &outcome {
            BenchOutcome::Completed(report) => info!(
                target: "fastqwen.bench",
                tokens = report.completion_tokens,
                duration_ms = u64::try_from(report.duration.as_millis()).unwrap_or(u64::MAX),
                tokens_per_second = report.tokens_per_second,
                "Benchmark completed"
            ),
            BenchOutcome::Failed(reason) => warn!(target: "fastqwen.bench", %reason, "Benchmark failed"),
        }
        outcome
    }
}

fn outcome_from_body(status: StatusCode, body: &str, duration: Duration) -> BenchOutcome {
    if !status.is_success() {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        return BenchOutcome::Failed(format!("HTTP {status}: {detail}"));
    }

    let response: ChatCompletionResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => return BenchOutcome::Failed(format!("unexpected response body: {e}")),
    };
    let Some(content) = response.first_content() else {
        return BenchOutcome::Failed("response has no choices".to_string());
    };

    BenchOutcome::Completed(BenchmarkReport::new(
        content.to_string(),
        response.usage.completion_tokens,
        duration,
    ))
}
