//! Quota rules - the post and claim decisions
//!
//! Stores gather the facts inside their critical section and call these
//! checks before mutating anything, so every backend applies the same order.

use crate::entities::Code;
use crate::error::DomainError;
use crate::value_objects::{CodeId, UserToken};

/// Per-user daily limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    pub post_daily_limit: u32,
    pub claim_daily_limit: u32,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            post_daily_limit: 5,
            claim_daily_limit: 3,
        }
    }
}

/// What a store knows about a pending post
#[derive(Debug, Clone, Copy)]
pub struct PostFacts {
    pub posts_today: u32,
    /// An active code with the same core code exists
    pub duplicate: bool,
}

/// What a store knows about a pending claim
#[derive(Debug, Clone, Copy)]
pub struct ClaimFacts<'a> {
    pub code_id: CodeId,
    pub code: Option<&'a Code>,
    pub claims_today: u32,
    pub already_claimed: bool,
}

impl QuotaLimits {
    /// Decide whether a post may be stored
    ///
    /// Post limit first, then duplicates.
    pub fn check_post(&self, facts: PostFacts) -> Result<(), DomainError> {
        if facts.posts_today >= self.post_daily_limit {
            return Err(DomainError::PostLimitReached {
                limit: self.post_daily_limit,
            });
        }
        if facts.duplicate {
            return Err(DomainError::DuplicateCode);
        }
        Ok(())
    }

    /// Decide whether a claim may proceed, returning the code to decrement
    ///
    /// Order: ownership, daily limit, already claimed, existence, exhaustion.
    /// A user's own code always reports `OwnCode`, whatever their quota.
    pub fn check_claim<'a>(
        &self,
        claimant: &UserToken,
        facts: ClaimFacts<'a>,
    ) -> Result<&'a Code, DomainError> {
        if facts.code.is_some_and(|code| code.is_owned_by(claimant)) {
            return Err(DomainError::OwnCode);
        }
        if facts.claims_today >= self.claim_daily_limit {
            return Err(DomainError::DailyLimitReached {
                limit: self.claim_daily_limit,
            });
        }
        if facts.already_claimed {
            return Err(DomainError::AlreadyClaimed);
        }
        let code = facts.code.ok_or(DomainError::CodeNotFound(facts.code_id))?;
        if code.is_exhausted() {
            return Err(DomainError::CodeExhausted);
        }
        Ok(code)
    }
}
