//! Error types for the REST adapter.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. The body
//! is always `{"error": message, "status": code}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use snake_core::PoolError;

/// Errors that can occur in the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request is malformed or describes an unusable setup.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested session does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PoolError> for ApiError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Configuration(_) | PoolError::ActionCountMismatch { .. } => {
                Self::BadRequest(err.to_string())
            }
            PoolError::SessionNotFound(_) => Self::NotFound(err.to_string()),
            PoolError::LockPoisoned(_) => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
