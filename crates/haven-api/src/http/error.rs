//! Application error type mapping to HTTP status codes and the envelope
//! format.
//!
//! An inference failure reaches the user as an inline error for that turn;
//! session state is only mutated after success, so there is nothing to
//! roll back.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use haven_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Inference call failed; the turn is aborted.
    Inference(LlmError),
    /// Unknown session id.
    SessionNotFound(String),
    /// A turn is already processing for this session.
    TurnInProgress,
    /// Bad request payload.
    Validation(String),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Inference(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Inference(e) => (
                StatusCode::BAD_GATEWAY,
                "INFERENCE_ERROR",
                format!("Error: {e}"),
            ),
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session '{id}' not found"),
            ),
            AppError::TurnInProgress => (
                StatusCode::CONFLICT,
                "TURN_IN_PROGRESS",
                "A turn is already processing for this session".to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": uuid::Uuid::now_v7().to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
