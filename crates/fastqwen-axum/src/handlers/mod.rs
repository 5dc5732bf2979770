//! HTTP handlers.

pub mod chat;
pub mod health;
pub mod models;

use crate::error::HttpError;

/// Fallback for unknown routes.
pub async fn not_found() -> HttpError {
    HttpError::NotFound("Not Found".to_string())
}
