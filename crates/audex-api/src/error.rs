//! # Application Error
//!
//! Maps domain errors to structured HTTP responses with proper status
//! codes and error bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use audex_core::DomainError;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unique-constraint or lifecycle conflict.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authentication required.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Insufficient permissions.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => Self::Validation(errors.to_string()),
            DomainError::DuplicateField { .. } | DomainError::StateTransition(_) => {
                Self::Conflict(err.to_string())
            }
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
            DomainError::Storage(_) | DomainError::Configuration(_) => {
                tracing::error!(error = %err, "non-recoverable domain error");
                Self::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}
