//! [`NativeEngine`] backed by a `llama-server` listener.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::process::Child;
use tracing::{debug, warn};

use fastqwen_core::{
    InferenceError, NativeChatRequest, NativeChatResponse, NativeEngine, NativeUsage,
};

use crate::process::shutdown_child;

/// A running `llama-server` and the HTTP client that talks to it.
pub struct LlamaServerEngine {
    client: Client,
    base_url: String,
    model_alias: String,
    child: Option<Child>,
}

impl std::fmt::Debug for LlamaServerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlamaServerEngine")
            .field("base_url", &self.base_url)
            .field("model_alias", &self.model_alias)
            .field("pid", &self.child.as_ref().and_then(Child::id))
            .finish_non_exhaustive()
    }
}

impl LlamaServerEngine {
    /// Wrap a listener at `base_url`. `child`, when given, is stopped on release.
    pub fn attach(
        client: Client,
        base_url: impl Into<String>,
        model_alias: impl Into<String>,
        child: Option<Child>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model_alias: model_alias.into(),
            child,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl NativeEngine for LlamaServerEngine {
    async fn chat_completion(
        &self,
        request: NativeChatRequest,
    ) -> Result<NativeChatResponse, InferenceError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = UpstreamRequest::new(&self.model_alias, &request);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = upstream_error_message(status, &text);
            debug!(target: "fastqwen.engine", %status, %message, "Engine returned an error");
            return Err(if status.is_client_error() {
                InferenceError::Rejected(message)
            } else {
                InferenceError::Engine(message)
            });
        }

        let parsed: UpstreamResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Engine(format!("undecodable engine response: {e}")))?;
        parsed.into_native()
    }

    async fn release(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        match shutdown_child(&mut child).await {
            Ok(status) => debug!(target: "fastqwen.engine", %status, "llama-server exited"),
            Err(e) => warn!(target: "fastqwen.engine", error = %e, "Failed to stop llama-server"),
        }
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
struct UpstreamRequest<'a> {
    model: &'a str,
    messages: Vec<UpstreamMessage<'a>>,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct UpstreamMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> UpstreamRequest<'a> {
    // The engine is always asked for a complete response; streaming to the
    // client is synthesized by the gateway.
    fn new(model: &'a str, request: &'a NativeChatRequest) -> Self {
        Self {
            model,
            messages: request
                .messages
                .iter()
                .map(|m| UpstreamMessage {
                    role: &m.role,
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    id: Option<String>,
    created: Option<i64>,
    model: Option<String>,
    #[serde(default)]
    choices: Vec<UpstreamChoice>,
    #[serde(default)]
    usage: Option<UpstreamUsage>,
}

#[derive(Debug, Deserialize)]
struct UpstreamChoice {
    message: UpstreamReply,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl UpstreamResponse {
    fn into_native(self) -> Result<NativeChatResponse, InferenceError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::Engine("engine returned no choices".to_string()))?;
        let usage = self.usage.unwrap_or_default();

        Ok(NativeChatResponse {
            id: self.id,
            created: self.created,
            model: self.model,
            text: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage: NativeUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: UpstreamErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}

/// Prefer `{"error":{"message":..}}`, fall back to the raw body, then the status.
fn upstream_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<UpstreamErrorBody>(body) {
        return parsed.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.to_string()
    } else {
        trimmed.to_string()
    }
}
