//! Code ID - opaque unique identifier for a posted code

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a posted code (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeId(Uuid);

impl CodeId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    #[inline]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the inner UUID
    #[inline]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// Parse from the hyphenated string form
    pub fn parse(s: &str) -> Result<Self, CodeIdParseError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| CodeIdParseError::InvalidFormat)
    }
}

/// Error when parsing a CodeId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodeIdParseError {
    #[error("invalid code id format")]
    InvalidFormat,
}

impl fmt::Display for CodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for CodeId {
    type Err = CodeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodeId::parse(s)
    }
}

impl From<Uuid> for CodeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<CodeId> for Uuid {
    fn from(id: CodeId) -> Self {
        id.0
    }
}
