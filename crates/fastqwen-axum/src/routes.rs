//! Route definitions and router construction.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{CorsConfig, GatewayContext};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/v1/models", get(handlers::models::list))
        .route("/v1/chat/completions", post(handlers::chat::completions))
        .fallback(handlers::not_found)
}

/// The full gateway router: routes, tracing, CORS.
pub fn create_router(ctx: GatewayContext, cors: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);
    api_routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors))
}
