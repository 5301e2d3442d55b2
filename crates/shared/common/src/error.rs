//! Unified error handling for the service layer and its HTTP adapter.
//!
//! Every failure a caller can observe is one of four kinds. The storage
//! cause behind an `OperationFailed` is kept as the error source for logs and
//! never sent to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Boxed error kept as the cause of an `OperationFailed`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller supplied a blank or malformed argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Username is held by another user (pre-check or storage constraint)
    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("User not found")]
    UserNotFound,

    /// Infrastructure failure; the original cause is the error source
    #[error("Operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: BoxError,
    },
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::OperationFailed { .. } => "OPERATION_FAILED",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateUsername(_) => StatusCode::CONFLICT,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::OperationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::OperationFailed { context, source } => {
                tracing::error!(context = %context, "Operation failed: {:?}", source);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::InvalidInput(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::UserNotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn duplicate_username(username: impl Into<String>) -> Self {
        AppError::DuplicateUsername(username.into())
    }

    pub fn operation_failed(
        context: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        AppError::OperationFailed {
            context: context.into(),
            source: source.into(),
        }
    }
}
