//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;

pub const NOT_FOUND: &str = "not_found";
pub const BAD_STATUS: &str = "bad_status";
pub const EXPECTED_JSON: &str = "expected_json";
pub const INVALID_PARAMS: &str = "invalid_params";

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request, with the code the client should branch on
    BadRequest { code: &'static str, message: String },
    /// Internal server error
    Internal(String),
    /// Repository error, tagged with the operation that failed
    Repository {
        operation: Option<&'static str>,
        error: RepositoryError,
    },
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        AppError::BadRequest {
            code,
            message: message.into(),
        }
    }

    /// Name the operation a repository failure happened in. The name becomes
    /// the `<operation>_failed` code of server-side errors.
    pub fn during(self, operation: &'static str) -> Self {
        match self {
            AppError::Repository { error, .. } => AppError::Repository {
                operation: Some(operation),
                error,
            },
            other => other,
        }
    }

    /// Status code and body for this error.
    pub fn to_parts(&self) -> (StatusCode, ApiError) {
        match self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ApiError::new(NOT_FOUND, msg.clone()))
            }
            AppError::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, ApiError::new(*code, message.clone()))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("internal_error", msg.clone()),
            ),
            AppError::Repository { operation, error } => {
                let message = error.to_string();
                match error {
                    e if e.is_not_found() => {
                        (StatusCode::NOT_FOUND, ApiError::new(NOT_FOUND, message))
                    }
                    RepositoryError::ValidationError { message, .. } => (
                        StatusCode::BAD_REQUEST,
                        ApiError::new(INVALID_PARAMS, message.clone()),
                    ),
                    RepositoryError::ConnectionError { .. } => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        ApiError::new("unavailable", message),
                    ),
                    _ => {
                        let code = operation
                            .map(|op| format!("{}_failed", op))
                            .unwrap_or_else(|| "repository_error".to_string());
                        (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(code, message))
                    }
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.to_parts();
        if status.is_server_error() {
            tracing::error!(code = %error.code, "{}", error.message);
        } else {
            tracing::debug!(code = %error.code, status = %status, "{}", error.message);
        }
        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository {
            operation: None,
            error: err,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
