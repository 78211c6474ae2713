use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application error type for the REST surface
#[derive(Debug)]
pub enum AppError {
    InternalServerError(String),
    BadRequest(String),
    PayloadTooLarge(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "Bad request")
            }
            AppError::PayloadTooLarge(msg) => {
                tracing::warn!("Payload too large: {}", msg);
                (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InternalServerError(msg) => write!(f, "Internal server error: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload too large: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
