//! User token - the opaque identity key supplied by the caller
//!
//! The board never issues or authenticates tokens; it only checks that the
//! value is usable as a storage key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, durable user identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserToken(String);

impl UserToken {
    /// Maximum accepted token length in characters
    pub const MAX_LEN: usize = 128;

    /// Parse a caller-supplied token
    ///
    /// Surrounding whitespace is trimmed. Empty tokens, tokens longer than
    /// [`Self::MAX_LEN`] and tokens containing control characters are rejected.
    pub fn parse(raw: &str) -> Result<Self, UserTokenError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(UserTokenError::Empty);
        }
        if token.chars().count() > Self::MAX_LEN {
            return Err(UserTokenError::TooLong { max: Self::MAX_LEN });
        }
        if token.chars().any(char::is_control) {
            return Err(UserTokenError::InvalidCharacter);
        }
        Ok(Self(token.to_string()))
    }

    /// Wrap a token read back from storage (already validated on the way in)
    pub fn from_stored(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Error when parsing a user token
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserTokenError {
    #[error("user id is empty")]
    Empty,

    #[error("user id is longer than {max} characters")]
    TooLong { max: usize },

    #[error("user id contains control characters")]
    InvalidCharacter,
}

impl fmt::Display for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
