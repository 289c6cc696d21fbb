//! Application error type and its HTTP rendering.
//!
//! Every fallible service call returns [`AppError`]. Handlers propagate it with `?`
//! and Axum renders it through [`IntoResponse`] as
//!
//! ```json
//! { "error": { "code": "invalid_input", "message": "...", "details": {} } }
//! ```
//!
//! Backend failures are rendered with a generic message so storage details
//! never reach the client; the original cause is logged instead.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;
use crate::utils::url_normalizer::UrlNormalizationError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed request or a URL with a disallowed scheme.
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    /// The requested code does not exist.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// A storage read, write or timeout failure.
    #[error("{message}")]
    BackendIo { message: String, details: Value },

    /// No free short code was found within the generation budget.
    #[error("{message}")]
    ExhaustedRetries { message: String, details: Value },

    /// Only one half of a forward/reverse write pair was persisted.
    #[error("{message}")]
    PartialWrite { message: String, details: Value },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn backend(message: impl Into<String>, details: Value) -> Self {
        Self::BackendIo {
            message: message.into(),
            details,
        }
    }

    pub fn exhausted_retries(message: impl Into<String>, details: Value) -> Self {
        Self::ExhaustedRetries {
            message: message.into(),
            details,
        }
    }

    pub fn partial_write(message: impl Into<String>, details: Value) -> Self {
        Self::PartialWrite {
            message: message.into(),
            details,
        }
    }

    /// Status code and machine-readable error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BackendIo { .. } => (StatusCode::SERVICE_UNAVAILABLE, "backend_unavailable"),
            AppError::ExhaustedRetries { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "exhausted_retries")
            }
            AppError::PartialWrite { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "partial_write"),
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        let (message, details) = match self {
            AppError::InvalidInput { message, details }
            | AppError::NotFound { message, details }
            | AppError::BackendIo { message, details }
            | AppError::ExhaustedRetries { message, details }
            | AppError::PartialWrite { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::PartialWrite { ref code, .. } => {
                tracing::error!(code = %code, error = %e, "Reverse index left inconsistent");
                AppError::partial_write("Failed to store the short link, try again", json!({}))
            }
            StoreError::CodeConflict(_) | StoreError::OriginalConflict { .. } => {
                tracing::warn!(error = %e, "Unhandled store conflict");
                AppError::backend("Storage temporarily unavailable, try again", json!({}))
            }
            StoreError::Backend(_) | StoreError::Timeout { .. } | StoreError::Malformed(_) => {
                tracing::error!(error = %e, "Store operation failed");
                AppError::backend("Storage temporarily unavailable, try again", json!({}))
            }
        }
    }
}

impl From<UrlNormalizationError> for AppError {
    fn from(e: UrlNormalizationError) -> Self {
        match e {
            UrlNormalizationError::UnsupportedProtocol(scheme) => AppError::invalid_input(
                "Only http and https URLs are allowed",
                json!({ "scheme": scheme }),
            ),
            other => AppError::invalid_input("Invalid URL", json!({ "reason": other.to_string() })),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::invalid_input("Request validation failed", json!(e.field_errors()))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::invalid_input("Invalid JSON body", json!({ "reason": e.body_text() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::invalid_input("x", json!({})), StatusCode::BAD_REQUEST),
            (AppError::not_found("x", json!({})), StatusCode::NOT_FOUND),
            (AppError::backend("x", json!({})), StatusCode::SERVICE_UNAVAILABLE),
            (
                AppError::exhausted_retries("x", json!({})),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::partial_write("x", json!({})),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_store_errors_do_not_leak_details() {
        let err: AppError =
            StoreError::Backend("connection refused to 10.0.0.5:5432".to_string()).into();
        let info = err.to_error_info();

        assert_eq!(info.code, "backend_unavailable");
        assert!(!info.message.contains("10.0.0.5"));
        assert_eq!(info.details, json!({}));
    }

    #[test]
    fn test_timeout_maps_to_backend_io() {
        let err: AppError = StoreError::Timeout {
            operation: "get_by_code",
            after: Duration::from_millis(50),
        }
        .into();
        assert!(matches!(err, AppError::BackendIo { .. }));
    }

    #[test]
    fn test_partial_write_is_surfaced() {
        let err: AppError = StoreError::PartialWrite {
            code: "abc1234".to_string(),
            reason: "lookup write failed".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::PartialWrite { .. }));
    }

    #[test]
    fn test_unsupported_protocol_is_invalid_input() {
        let err: AppError = UrlNormalizationError::UnsupportedProtocol("ftp".to_string()).into();
        let info = err.to_error_info();

        assert_eq!(info.code, "invalid_input");
        assert_eq!(info.details["scheme"], "ftp");
    }
}
