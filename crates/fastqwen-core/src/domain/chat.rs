//! OpenAI-compatible chat completion types.
//!
//! These types are the stable HTTP contract. They are deliberately independent
//! of the engine-native types in [`super::native`]; the translator in
//! `services::translator` is the only code that knows both shapes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::error::Category;
use thiserror::Error;

/// Model name assumed when a request omits `model`.
pub const DEFAULT_REQUEST_MODEL: &str = "qwen-0.5b";

/// Sampling temperature used when a request omits it or sends `null`.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Nucleus sampling threshold used when a request omits it or sends `null`.
pub const DEFAULT_TOP_P: f32 = 0.9;

const CHAT_COMPLETION_OBJECT: &str = "chat.completion";
const CHAT_COMPLETION_CHUNK_OBJECT: &str = "chat.completion.chunk";

// =============================================================================
// Request
// =============================================================================

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", "assistant". Not interpreted here.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model name. Informational; the gateway serves a single model.
    #[serde(default = "default_model")]
    pub model: String,
    /// Ordered conversation. Must not be empty.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    #[serde(default = "default_temperature", deserialize_with = "temperature_or_default")]
    pub temperature: f32,
    /// Top-p sampling parameter.
    #[serde(default = "default_top_p", deserialize_with = "top_p_or_default")]
    pub top_p: f32,
    /// Maximum tokens to generate. `None` lets the engine choose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Whether the client wants a streamed (SSE) response.
    #[serde(default)]
    pub stream: bool,
}

fn default_model() -> String {
    DEFAULT_REQUEST_MODEL.to_string()
}

const fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

const fn default_top_p() -> f32 {
    DEFAULT_TOP_P
}

// `null` is accepted for the sampling fields and means "use the default".
fn temperature_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(DEFAULT_TEMPERATURE))
}

fn top_p_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(DEFAULT_TOP_P))
}

impl ChatCompletionRequest {
    /// Create a request with default sampling parameters.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: default_model(),
            messages,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: None,
            stream: false,
        }
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub const fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Parse and validate a raw JSON body.
    ///
    /// Distinguishes bodies that are not JSON at all from JSON that does not
    /// match the request shape, so the HTTP layer can pick 400 vs 422.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, RequestBodyError> {
        let request: Self = serde_json::from_slice(body).map_err(|e| match e.classify() {
            Category::Data => RequestBodyError::Shape(e.to_string()),
            Category::Syntax | Category::Eof | Category::Io => {
                RequestBodyError::Syntax(e.to_string())
            }
        })?;
        request.validate()?;
        Ok(request)
    }

    /// Check structural constraints, collecting every violation.
    ///
    /// Role and content values are not inspected; the engine is
    /// authoritative on role semantics.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.messages.is_empty() {
            violations.push("messages: must contain at least one message".to_string());
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            violations.push(format!(
                "temperature: must be a non-negative number, got {}",
                self.temperature
            ));
        }
        if !self.top_p.is_finite() || !(0.0..=1.0).contains(&self.top_p) {
            violations.push(format!(
                "top_p: must be between 0 and 1, got {}",
                self.top_p
            ));
        }
        if self.max_tokens == Some(0) {
            violations.push("max_tokens: must be at least 1".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

/// A request failed structural validation.
///
/// Carries every violation found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid request: {}", violations.join("; "))]
pub struct ValidationError {
    pub violations: Vec<String>,
}

/// Why a request body could not be turned into a [`ChatCompletionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestBodyError {
    /// The body is not well-formed JSON.
    #[error("Malformed JSON body: {0}")]
    Syntax(String),

    /// The body is JSON but does not have the request shape.
    #[error("Invalid request body: {0}")]
    Shape(String),

    /// The body has the right shape but violates a constraint.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

// =============================================================================
// Response
// =============================================================================

/// Response from `/v1/chat/completions` (non-streaming).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}

/// A single chat completion choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl ChatCompletionResponse {
    pub(crate) fn object_name() -> String {
        CHAT_COMPLETION_OBJECT.to_string()
    }

    /// Text of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }

    /// Re-express a finished completion as the chunk sequence a streaming
    /// client expects: one role chunk, one content chunk per choice, and a
    /// closing chunk per choice carrying `finish_reason`.
    pub fn into_chunks(self) -> Vec<ChatCompletionChunk> {
        let Self {
            id,
            created,
            model,
            choices,
            ..
        } = self;

        let chunk = |choice: ChunkChoice| ChatCompletionChunk {
            id: id.clone(),
            object: CHAT_COMPLETION_CHUNK_OBJECT.to_string(),
            created,
            model: model.clone(),
            choices: vec![choice],
        };

        let mut chunks = Vec::with_capacity(choices.len() * 3);
        for choice in choices {
            chunks.push(chunk(ChunkChoice {
                index: choice.index,
                delta: ChatDelta {
                    role: Some(choice.message.role),
                    content: None,
                },
                finish_reason: None,
            }));
            chunks.push(chunk(ChunkChoice {
                index: choice.index,
                delta: ChatDelta {
                    role: None,
                    content: Some(choice.message.content),
                },
                finish_reason: None,
            }));
            chunks.push(chunk(ChunkChoice {
                index: choice.index,
                delta: ChatDelta::default(),
                finish_reason: choice.finish_reason,
            }));
        }
        chunks
    }
}

/// Streaming chunk for `/v1/chat/completions` with `stream: true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

/// A single streaming choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChatDelta,
    pub finish_reason: Option<String>,
}

/// Delta content in a streaming response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
