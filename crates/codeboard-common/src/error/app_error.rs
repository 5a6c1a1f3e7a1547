//! Application error types
//!
//! Unified error handling for the entire application.

use codeboard_core::{DomainError, ErrorKind};
use serde::Serialize;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Identity errors
    #[error("Missing X-User-Id header")]
    MissingUserId,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Rate limiting
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::Validation(_) => 400,

            // 401 Unauthorized
            Self::MissingUserId => 401,

            // 429 Too Many Requests
            Self::RateLimitExceeded => 429,

            // 500 Internal Server Error
            Self::Storage(_) | Self::Internal(_) | Self::Config(_) => 500,

            Self::Domain(e) => Self::domain_status(e),
        }
    }

    /// HTTP status of a board rule outcome
    #[must_use]
    pub fn domain_status(e: &DomainError) -> u16 {
        if e.is_not_found() {
            404
        } else if e.is_authorization() {
            403
        } else if e.is_validation() {
            400
        } else if e.is_conflict() {
            409
        } else if e.is_quota() {
            429
        } else {
            500
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingUserId => "MISSING_USER_ID",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Outcome category; everything outside the board rules is `Other`
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => e.kind(),
            _ => ErrorKind::Other,
        }
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        let status = self.status_code();
        (500..600).contains(&status)
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Message returned in place of any server-side failure detail
pub const SERVER_ERROR_MESSAGE: &str = "Something went wrong, please try again";

/// Error response structure for API responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let message = if err.is_server_error() {
            // Storage and internal details stay in the logs
            SERVER_ERROR_MESSAGE.to_string()
        } else {
            err.to_string()
        };
        Self {
            code: err.error_code().to_string(),
            kind: err.kind(),
            message,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}
