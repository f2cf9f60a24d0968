//! Identity Error Types
//!
//! This module provides identity-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Identity-specific result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

/// A single failed validation check, in input-field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Identity-specific error variants
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Input validation failed; carries every failing field, not just the first
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Email is already registered
    #[error("Email is already in use")]
    DuplicateEmail,

    /// Authentication failure. One variant, one message, for both the
    /// absent-account and wrong-password cases; anything finer-grained
    /// would leak which emails are registered.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token is past its expiry
    #[error("Token has expired")]
    TokenExpired,

    /// Token failed signature, issuer, audience, or structural checks.
    /// Tampered and malformed tokens are deliberately indistinguishable.
    #[error("Token is invalid")]
    TokenInvalid,

    /// Account does not exist (CRUD surface only, never login)
    #[error("Account not found")]
    AccountNotFound,

    /// Path and body identifiers do not match
    #[error("IDs do not match")]
    IdMismatch,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            IdentityError::Validation(_)
            | IdentityError::DuplicateEmail
            | IdentityError::IdMismatch => StatusCode::BAD_REQUEST,
            IdentityError::InvalidCredentials
            | IdentityError::TokenExpired
            | IdentityError::TokenInvalid => StatusCode::UNAUTHORIZED,
            IdentityError::AccountNotFound => StatusCode::NOT_FOUND,
            IdentityError::Database(_) | IdentityError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::Validation(_)
            | IdentityError::DuplicateEmail
            | IdentityError::IdMismatch => ErrorKind::BadRequest,
            IdentityError::InvalidCredentials
            | IdentityError::TokenExpired
            | IdentityError::TokenInvalid => ErrorKind::Unauthorized,
            IdentityError::AccountNotFound => ErrorKind::NotFound,
            IdentityError::Database(_) | IdentityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            IdentityError::Database(e) => {
                tracing::error!(error = %e, "Identity database error");
            }
            IdentityError::Internal(msg) => {
                tracing::error!(message = %msg, "Identity internal error");
            }
            IdentityError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Identity error");
            }
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            // Field-level errors are surfaced verbatim, in order
            IdentityError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "errors": fields })),
            )
                .into_response(),
            // Database errors carry their own status mapping (503 for
            // connectivity, 500 otherwise)
            IdentityError::Database(e) => AppError::from(e).into_response(),
            other => other.to_app_error().into_response(),
        }
    }
}
