//! Domain errors - error types for the domain layer
//!
//! Every business-rule outcome is a variant here. None of them is a fault:
//! callers match on [`DomainError::kind`] or [`DomainError::code`].

use serde::Serialize;
use thiserror::Error;

use crate::value_objects::{CodeId, UserTokenError};

/// Machine-checkable outcome category reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    TooLong,
    BadFormat,
    PostLimitReached,
    Duplicate,
    OwnCode,
    DailyLimitReached,
    AlreadyClaimed,
    NotFound,
    Exhausted,
    Other,
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Post Validation
    // =========================================================================
    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Content does not contain a valid code")]
    BadFormat,

    #[error("Invalid user id: {0}")]
    InvalidUserToken(#[from] UserTokenError),

    // =========================================================================
    // Quota
    // =========================================================================
    #[error("Daily post limit reached ({limit} per day)")]
    PostLimitReached { limit: u32 },

    #[error("Daily claim limit reached ({limit} per day)")]
    DailyLimitReached { limit: u32 },

    // =========================================================================
    // Ownership
    // =========================================================================
    #[error("Cannot claim a code you posted")]
    OwnCode,

    // =========================================================================
    // Conflicts
    // =========================================================================
    #[error("This code is already on the board")]
    DuplicateCode,

    #[error("You have already claimed this code")]
    AlreadyClaimed,

    #[error("This code has no uses left")]
    CodeExhausted,

    // =========================================================================
    // Not Found
    // =========================================================================
    #[error("Code not found: {0}")]
    CodeNotFound(CodeId),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Outcome category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ContentTooLong { .. } => ErrorKind::TooLong,
            Self::BadFormat => ErrorKind::BadFormat,
            Self::PostLimitReached { .. } => ErrorKind::PostLimitReached,
            Self::DuplicateCode => ErrorKind::Duplicate,
            Self::OwnCode => ErrorKind::OwnCode,
            Self::DailyLimitReached { .. } => ErrorKind::DailyLimitReached,
            Self::AlreadyClaimed => ErrorKind::AlreadyClaimed,
            Self::CodeNotFound(_) => ErrorKind::NotFound,
            Self::CodeExhausted => ErrorKind::Exhausted,
            Self::InvalidUserToken(_) | Self::StorageError(_) | Self::InternalError(_) => {
                ErrorKind::Other
            }
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::ContentTooLong { .. } => "TOO_LONG",
            Self::BadFormat => "BAD_FORMAT",
            Self::InvalidUserToken(_) => "INVALID_USER_ID",
            Self::PostLimitReached { .. } => "POST_LIMIT_REACHED",
            Self::DailyLimitReached { .. } => "DAILY_LIMIT_REACHED",
            Self::OwnCode => "OWN_CODE",
            Self::DuplicateCode => "DUPLICATE",
            Self::AlreadyClaimed => "ALREADY_CLAIMED",
            Self::CodeExhausted => "EXHAUSTED",
            Self::CodeNotFound(_) => "NOT_FOUND",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CodeNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ContentTooLong { .. } | Self::BadFormat | Self::InvalidUserToken(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::OwnCode)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateCode | Self::AlreadyClaimed | Self::CodeExhausted
        )
    }

    /// Check if this is a daily quota error
    pub fn is_quota(&self) -> bool {
        matches!(
            self,
            Self::PostLimitReached { .. } | Self::DailyLimitReached { .. }
        )
    }

    /// Check if the backing store failed (retrying may help)
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::StorageError(_) | Self::InternalError(_))
    }
}
