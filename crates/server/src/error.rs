//! Boundary errors for the cep-cache server.
//!
//! Translates lookup outcomes into HTTP statuses and the fixed Portuguese
//! error bodies. Internal detail is logged here and never sent to callers.

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cep_core::{ErrorResponse, LookupError, response::INTERNAL_ERROR_MESSAGE};

/// A lookup failure on its way out of the HTTP boundary.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub LookupError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LookupError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            LookupError::NotFound(_) => StatusCode::NOT_FOUND,
            LookupError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            LookupError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self.0 {
            LookupError::Internal(detail) => tracing::error!(error = %detail, "unhandled lookup failure"),
            LookupError::UpstreamUnavailable(detail) => tracing::warn!(error = %detail, "CEP provider unavailable"),
            other => tracing::debug!(error = %other, "lookup rejected"),
        }

        (status, Json(ErrorResponse::new(self.0.public_message()))).into_response()
    }
}

/// Response for a panic caught inside a handler.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE))).into_response()
}
