//! Server-Sent Events rendering of a finished completion.
//!
//! The engine always produces a complete response; for `stream: true`
//! requests it is replayed as `chat.completion.chunk` events followed by
//! the `[DONE]` sentinel.

use axum::response::sse::{Event, Sse};
use fastqwen_core::ChatCompletionResponse;
use futures_util::stream::{self, Stream};

/// Terminal SSE payload expected by OpenAI clients.
pub const DONE_SENTINEL: &str = "[DONE]";

pub fn completion_stream(
    response: ChatCompletionResponse,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>> + Send + 'static> {
    let events: Vec<Result<Event, axum::Error>> = response
        .into_chunks()
        .into_iter()
        .map(|chunk| Event::default().json_data(chunk))
        .chain(std::iter::once(Ok(Event::default().data(DONE_SENTINEL))))
        .collect();
    Sse::new(stream::iter(events))
}
