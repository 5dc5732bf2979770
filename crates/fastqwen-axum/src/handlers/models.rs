use axum::Json;
use axum::extract::State;
use fastqwen_core::ModelList;

use crate::state::AppState;

/// `GET /v1/models`: the single served model, independent of engine state.
pub async fn list(State(ctx): State<AppState>) -> Json<ModelList> {
    Json(ModelList::single(ctx.slot().model_id()))
}
