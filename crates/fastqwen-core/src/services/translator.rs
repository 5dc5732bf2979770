//! OpenAI surface <-> engine-native contract.
//!
//! No business logic: messages map 1:1, sampling parameters and usage
//! counters pass through untouched.

use uuid::Uuid;

use crate::domain::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, NativeChatRequest,
    NativeChatResponse, NativeMessage, Usage,
};

const ASSISTANT_ROLE: &str = "assistant";

pub fn to_native_request(request: &ChatCompletionRequest) -> NativeChatRequest {
    NativeChatRequest {
        messages: request
            .messages
            .iter()
            .map(|m| NativeMessage {
                role: m.role.clone(),
                content: m.content.clone(),
            })
            .collect(),
        temperature: request.temperature,
        top_p: request.top_p,
        max_tokens: request.max_tokens,
        stream: request.stream,
    }
}

/// Build the OpenAI response for a finished native call.
///
/// `requested_model` is echoed when the engine does not name its model.
pub fn from_native_response(
    native: NativeChatResponse,
    requested_model: &str,
) -> ChatCompletionResponse {
    let NativeChatResponse {
        id,
        created,
        model,
        text,
        finish_reason,
        usage,
    } = native;

    ChatCompletionResponse {
        id: id.unwrap_or_else(|| format!("chatcmpl-{}", Uuid::new_v4().simple())),
        object: ChatCompletionResponse::object_name(),
        created: created.unwrap_or_else(|| chrono::Utc::now().timestamp()),
        model: model.unwrap_or_else(|| requested_model.to_string()),
        choices: vec![ChatChoice {
            index: 0,
            message: ChatMessage::new(ASSISTANT_ROLE, text),
            finish_reason,
        }],
        usage: Usage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NativeUsage;

    #[test]
    fn test_messages_map_in_order() {
        let request = ChatCompletionRequest::new(vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("one"),
            ChatMessage::assistant("two"),
            ChatMessage::new("tool", "three"),
        ])
        .with_max_tokens(100)
        .with_temperature(0.1)
        .with_stream(true);

        let native = to_native_request(&request);
        let roles: Vec<_> = native.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["system", "user", "assistant", "tool"]);
        assert_eq!(native.messages[1].content, "one");
        assert_eq!(native.max_tokens, Some(100));
        assert!((native.temperature - 0.1).abs() < f32::EPSILON);
        assert!((native.top_p - 0.9).abs() < f32::EPSILON);
        assert!(native.stream);
    }

    #[test]
    fn test_max_tokens_none_preserved() {
        let request = ChatCompletionRequest::new(vec![ChatMessage::user("x")]);
        assert_eq!(to_native_request(&request).max_tokens, None);
    }

    #[test]
    fn test_response_fills_missing_metadata() {
        let native = NativeChatResponse::new("hello!", Some("length"), NativeUsage::new(5, 7));
        let response = from_native_response(native, "qwen-0.5b");

        assert!(response.id.starts_with("chatcmpl-"));
        assert_eq!(response.object, "chat.completion");
        assert!(response.created > 0);
        assert_eq!(response.model, "qwen-0.5b");
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].index, 0);
        assert_eq!(response.choices[0].message.role, "assistant");
        assert_eq!(response.choices[0].message.content, "hello!");
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("length"));
    }

    #[test]
    fn test_response_keeps_engine_metadata() {
        let mut native = NativeChatResponse::new("x", None, NativeUsage::default());
        native.id = Some("abc".to_string());
        native.created = Some(1234);
        native.model = Some("engine-model".to_string());

        let response = from_native_response(native, "requested");
        assert_eq!(response.id, "abc");
        assert_eq!(response.created, 1234);
        assert_eq!(response.model, "engine-model");
        assert_eq!(response.choices[0].finish_reason, None);
    }

    #[test]
    fn test_usage_copied_verbatim() {
        // Deliberately inconsistent: totals are not recomputed.
        let usage = NativeUsage {
            prompt_tokens: 10,
            completion_tokens: 20,
            total_tokens: 99,
        };
        let native = NativeChatResponse::new("x", Some("stop"), usage);
        let response = from_native_response(native, "m");
        assert_eq!(response.usage.prompt_tokens, 10);
        assert_eq!(response.usage.completion_tokens, 20);
        assert_eq!(response.usage.total_tokens, 99);
    }
}
