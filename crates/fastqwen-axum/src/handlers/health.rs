use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse<'a> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
}

/// `GET /health`: 200 once the engine is ready, 503 before. Never blocks.
pub async fn health(State(ctx): State<AppState>) -> Response {
    let slot = ctx.slot();
    if slot.is_ready() {
        let body = HealthResponse {
            status: "ok",
            model: Some(slot.model_id()),
        };
        (StatusCode::OK, Json(body)).into_response()
    } else {
        let body = HealthResponse {
            status: "initializing",
            model: None,
        };
        (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
    }
}
