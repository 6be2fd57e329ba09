use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E7xxx: Analytics errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    MissingRequiredField,
    StorageWriteFailed,
    PayloadTooLarge,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "E7001",
            Self::StorageWriteFailed => "E7002",
            Self::PayloadTooLarge => "E7003",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingRequiredField => StatusCode::BAD_REQUEST,
            Self::StorageWriteFailed => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    code: ErrorCode,
    message: String,
    details: Option<serde_json::Value>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// 400 naming every required field that was absent or empty.
    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::with_details(
            ErrorCode::MissingRequiredField,
            format!("Missing required fields: {}", fields.join(", ")),
            serde_json::json!({ "missing": fields }),
        )
    }

    pub fn storage_write(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageWriteFailed, message)
    }

    /// 413 for a body over the route's byte limit.
    pub fn payload_too_large(limit: usize) -> Self {
        Self::with_details(
            ErrorCode::PayloadTooLarge,
            format!("Request body exceeds {limit} bytes"),
            serde_json::json!({ "limit": limit }),
        )
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code.code(), "{}", self.message);
        } else {
            tracing::warn!(code = self.code.code(), "{}", self.message);
        }

        let mut body = ApiErrorResponse::new(self.code.code(), self.message);
        if let Some(details) = self.details {
            body = body.with_details(details);
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
