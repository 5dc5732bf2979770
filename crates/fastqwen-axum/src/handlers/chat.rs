//! `POST /v1/chat/completions`.

use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use fastqwen_core::{ChatCompletionRequest, from_native_response, to_native_request};
use tracing::{debug, info, warn};

use crate::error::HttpError;
use crate::sse::completion_stream;
use crate::state::AppState;

/// Parse, gate on readiness, run one serialized inference, respond.
///
/// Parsing and translation happen before the engine lock is taken and
/// serialization after it is released.
pub async fn completions(
    State(ctx): State<AppState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let request = ChatCompletionRequest::from_json_slice(&body).inspect_err(|e| {
        debug!(target: "fastqwen.http", error = %e, "Rejected chat request body");
    })?;

    let handle = ctx.slot().ready_handle()?;

    let native = to_native_request(&request);
    let started = Instant::now();
    let result = handle.infer(native).await.inspect_err(|e| {
        warn!(target: "fastqwen.http", error = %e, "Inference failed");
    })?;

    info!(
        target: "fastqwen.http",
        messages = request.messages.len(),
        prompt_tokens = result.usage.prompt_tokens,
        completion_tokens = result.usage.completion_tokens,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        stream = request.stream,
        "Chat completion served"
    );

    let response = from_native_response(result, &request.model);
    if request.stream {
        Ok(completion_stream(response).into_response())
    } else {
        Ok(Json(response).into_response())
    }
}
