//! Error types for the pull API layer.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur while serving a pull API request.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The requested entity or route was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// An invalid query or path parameter was provided.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The simulation has not been installed yet.
    #[error("simulation not available")]
    Unavailable,

    /// A serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
