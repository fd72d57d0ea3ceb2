//! Webhook request errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Reasons a webhook request is not accepted.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Missing X-Line-Signature header")]
    MissingSignature,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Empty request body")]
    EmptyBody,

    #[error("Malformed webhook body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error("Error processing Line event")]
    AllEventsFailed { failed: usize },
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::EmptyBody
            | WebhookError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            WebhookError::AllEventsFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
