//! Code entity - a redemption code posted to the shared board

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{CalendarDay, CodeId, UserToken};

/// A posted code and its remaining-use counter
///
/// `remaining_uses` only ever decreases. A code at zero is exhausted: it drops
/// out of the listing but is never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub id: CodeId,
    /// Posted content, verbatim
    pub content: String,
    /// Pattern-matched sub-string used for duplicate detection
    pub core_code: String,
    pub owner: UserToken,
    pub remaining_uses: u32,
    pub created_at: DateTime<Utc>,
    /// Calendar day the code was posted on
    pub posted_on: CalendarDay,
}

/// A validated post waiting to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCode {
    pub content: String,
    pub core_code: String,
    pub owner: UserToken,
}

impl NewCode {
    pub fn new(content: String, core_code: String, owner: UserToken) -> Self {
        Self {
            content,
            core_code,
            owner,
        }
    }
}

impl Code {
    /// Materialize a new code with a fresh id
    pub fn create(
        draft: NewCode,
        initial_uses: u32,
        created_at: DateTime<Utc>,
        posted_on: CalendarDay,
    ) -> Self {
        Self {
            id: CodeId::generate(),
            content: draft.content,
            core_code: draft.core_code,
            owner: draft.owner,
            remaining_uses: initial_uses,
            created_at,
            posted_on,
        }
    }

    /// Check if the code has no uses left
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining_uses == 0
    }

    /// Check if the code still shows up on the board
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.is_exhausted()
    }

    #[inline]
    pub fn is_owned_by(&self, user: &UserToken) -> bool {
        &self.owner == user
    }

    /// Consume one use
    ///
    /// # Errors
    /// Returns `DomainError::CodeExhausted` if no uses are left; the counter is
    /// left untouched.
    pub fn consume_use(&mut self) -> Result<u32, DomainError> {
        self.remaining_uses = self
            .remaining_uses
            .checked_sub(1)
            .ok_or(DomainError::CodeExhausted)?;
        Ok(self.remaining_uses)
    }

    /// Creation time as epoch milliseconds
    pub fn created_at_millis(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}
