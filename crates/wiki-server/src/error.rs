//! Mapping of page and render failures onto HTTP responses

use crate::render::RenderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use wiki_core::WikiError;

/// Error returned by handlers, rendered as a plain-text body
#[derive(Debug)]
pub enum ApiError {
    /// A title rejected by the title rules (empty, path separators, reserved).
    /// Answered with 400 rather than a 500, since retrying the same request cannot succeed.
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<WikiError> for ApiError {
    fn from(err: WikiError) -> Self {
        match &err {
            WikiError::InvalidTitle { .. } => ApiError::BadRequest(err.to_string()),
            WikiError::NotFound(_) => ApiError::NotFound(err.to_string()),
            WikiError::Io(_) | WikiError::Database(_) => {
                ApiError::Internal(format!("Storage failure: {}", err))
            }
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                tracing::error!("{}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, message).into_response()
    }
}
