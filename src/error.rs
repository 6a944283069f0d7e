/// Unified error types for the EstatePro service
use crate::validation::FieldError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Single-message validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Form validation errors, enumerating every offending field
    #[error("Validation failed")]
    InvalidForm(Vec<FieldError>),

    /// Duplicate unique field (email, phone)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Role or ownership check failed
    #[error("Not authorized: {0}")]
    Forbidden(String),

    /// No matching record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credential check failed
    #[error("Authentication failed: {0}")]
    InvalidCredential(String),

    /// Account locked after repeated failed logins
    #[error("Account locked: {0}")]
    Locked(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, errors) = match self {
            ApiError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                self.to_string(),
                None,
            ),
            ApiError::InvalidForm(fields) => (
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                "Validation failed".to_string(),
                Some(fields),
            ),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "Conflict", self.to_string(), None),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden", self.to_string(), None),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound", self.to_string(), None),
            ApiError::InvalidCredential(_) => (
                StatusCode::UNAUTHORIZED,
                "AuthenticationRequired",
                self.to_string(),
                None,
            ),
            ApiError::Locked(_) => (StatusCode::LOCKED, "AccountLocked", self.to_string(), None),
            ApiError::Database(_) | ApiError::Internal(_) | ApiError::Io(_) => {
                tracing::error!("internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    // Don't leak details
                    "Internal server error. Please try again later.".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Result type alias for service operations
pub type ApiResult<T> = Result<T, ApiError>;
