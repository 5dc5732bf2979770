//! HTTP error type and mappings from core errors.
//!
//! Every error body is `{"detail": "..."}`; validation failures add an
//! `errors` array with one entry per violation.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use fastqwen_core::{CoreError, InferenceError, RequestBodyError};
use serde::Serialize;
use thiserror::Error;

/// Seconds a client should wait before retrying a 503.
pub const RETRY_AFTER_SECS: &str = "5";

/// Detail sent while the engine is not ready.
pub const NOT_READY_DETAIL: &str = "Model is still loading";

#[derive(Debug, Error)]
pub enum HttpError {
    /// Body is not JSON (400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Body is JSON but not a valid request (422).
    #[error("Unprocessable request: {detail}")]
    Unprocessable { detail: String, errors: Vec<String> },

    /// Engine not ready (503, with `Retry-After`).
    #[error("Service unavailable: {0}")]
    NotReady(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Inference or other server-side failure (500).
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Unprocessable { detail, errors } => ErrorBody { detail, errors },
            Self::BadRequest(detail)
            | Self::NotReady(detail)
            | Self::NotFound(detail)
            | Self::Internal(detail) => ErrorBody {
                detail,
                errors: Vec::new(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from_static(RETRY_AFTER_SECS),
            );
        }
        response
    }
}

impl From<RequestBodyError> for HttpError {
    fn from(err: RequestBodyError) -> Self {
        match err {
            RequestBodyError::Syntax(msg) => Self::BadRequest(msg),
            RequestBodyError::Shape(msg) => Self::Unprocessable {
                detail: msg.clone(),
                errors: vec![msg],
            },
            RequestBodyError::Invalid(v) => Self::Unprocessable {
                detail: v.to_string(),
                errors: v.violations,
            },
        }
    }
}

impl From<InferenceError> for HttpError {
    fn from(err: InferenceError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotReady(_) => Self::NotReady(NOT_READY_DETAIL.to_string()),
            CoreError::Inference(e) => e.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}
