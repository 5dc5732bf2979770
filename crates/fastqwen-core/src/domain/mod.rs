//! Domain types shared by every fastqwen adapter.
//!
//! - `chat`: the OpenAI-shaped request/response surface
//! - `catalog`: the `/v1/models` listing
//! - `native`: the engine-native call contract
//! - `readiness`: the process-wide readiness state

pub mod catalog;
pub mod chat;
pub mod native;
pub mod readiness;

pub use catalog::{MODEL_CREATED_AT, MODEL_OWNER, ModelCard, ModelList};
pub use chat::{
    ChatChoice, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatDelta,
    ChatMessage, ChunkChoice, DEFAULT_REQUEST_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
    RequestBodyError, Usage, ValidationError,
};
pub use native::{NativeChatRequest, NativeChatResponse, NativeMessage, NativeUsage};
pub use readiness::ReadinessState;
