//! Universal error handling for the API

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common_types::ErrorMessage;

use crate::upload_storage::StorageError;

/// Message returned whenever an upload URL cannot be produced
pub const SIGNING_FAILED_MESSAGE: &str = "Error generating signed URL";

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ErrorMessage,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            inner: ErrorMessage {
                message: message.into(),
            },
        }
    }

    /// Create a `400 Bad Request` error
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// HTTP status of the error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Message sent to the client
    #[must_use]
    pub fn message(&self) -> &str {
        &self.inner.message
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {}", self.inner.message),
            500..=599 => tracing::error!("Server error: {}", self.inner.message),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Convert storage errors to application errors
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        // Details stay in the logs, the caller only learns that signing failed
        tracing::error!("Upload URL generation failed: {err}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, SIGNING_FAILED_MESSAGE)
    }
}

impl OperationOutput for AppError {
    type Inner = ErrorMessage;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ErrorMessage>::operation_response(ctx, operation)
    }
}
