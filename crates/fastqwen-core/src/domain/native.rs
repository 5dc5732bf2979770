//! Engine-native call contract.
//!
//! What a [`crate::ports::NativeEngine`] accepts and returns. Kept separate
//! from the OpenAI types so either side can evolve without touching the other.

/// One message as the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeMessage {
    pub role: String,
    pub content: String,
}

/// A chat completion call into the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeChatRequest {
    pub messages: Vec<NativeMessage>,
    pub temperature: f32,
    pub top_p: f32,
    /// `None` lets the engine apply its own limit.
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

impl NativeChatRequest {
    /// Total characters across all message contents.
    pub fn content_len(&self) -> usize {
        self.messages.iter().map(|m| m.content.chars().count()).sum()
    }
}

/// Token counters reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NativeUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl NativeUsage {
    pub const fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Result of a chat completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeChatResponse {
    /// Engine-assigned completion id, if it produces one.
    pub id: Option<String>,
    /// Engine-assigned Unix timestamp, if it produces one.
    pub created: Option<i64>,
    /// Model name as reported by the engine.
    pub model: Option<String>,
    pub text: String,
    pub finish_reason: Option<String>,
    pub usage: NativeUsage,
}

impl NativeChatResponse {
    /// A response carrying only text, finish reason and usage.
    pub fn new(text: impl Into<String>, finish_reason: Option<&str>, usage: NativeUsage) -> Self {
        Self {
            id: None,
            created: None,
            model: None,
            text: text.into(),
            finish_reason: finish_reason.map(str::to_string),
            usage,
        }
    }
}
