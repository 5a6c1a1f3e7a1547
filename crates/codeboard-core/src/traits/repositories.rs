//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Registry writes that touch the ledger
//! (`create`, `claim`) must be atomic with their quota checks: a backend
//! evaluates the rules in [`crate::rules`] and applies the mutation inside
//! one critical section or transaction.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Code, NewCode};
use crate::error::DomainError;
use crate::rules::QuotaLimits;
use crate::value_objects::{CalendarDay, CodeId, UserToken};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// When an action happens, in both clock and quota terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionStamp {
    pub at: DateTime<Utc>,
    pub day: CalendarDay,
}

impl ActionStamp {
    pub fn new(at: DateTime<Utc>, day: CalendarDay) -> Self {
        Self { at, day }
    }
}

// ============================================================================
// Code Registry
// ============================================================================

#[async_trait]
pub trait CodeRegistry: Send + Sync {
    /// Newest `limit` codes with uses left, returned oldest first
    async fn list_active(&self, limit: usize) -> RepoResult<Vec<Code>>;

    /// Find a code by ID, exhausted or not
    async fn find_by_id(&self, id: CodeId) -> RepoResult<Option<Code>>;

    /// Store a new code and record the post in one atomic step
    ///
    /// Fails with `PostLimitReached` or `DuplicateCode` without side effects.
    async fn create(
        &self,
        draft: NewCode,
        stamp: ActionStamp,
        limits: QuotaLimits,
        initial_uses: u32,
    ) -> RepoResult<Code>;

    /// Consume one use of a code and record the claim in one atomic step
    ///
    /// Checks run in the order of [`QuotaLimits::check_claim`].
    async fn claim(
        &self,
        id: CodeId,
        claimant: &UserToken,
        stamp: ActionStamp,
        limits: QuotaLimits,
    ) -> RepoResult<Code>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> RepoResult<()>;
}

// ============================================================================
// Quota Ledger
// ============================================================================

#[async_trait]
pub trait QuotaLedger: Send + Sync {
    /// Codes posted by `user` on `day`
    async fn post_count(&self, user: &UserToken, day: CalendarDay) -> RepoResult<u32>;

    /// Codes claimed by `user` on `day`
    async fn claim_count(&self, user: &UserToken, day: CalendarDay) -> RepoResult<u32>;

    /// Whether `user` claimed `code_id` on any retained day
    async fn has_claimed(&self, user: &UserToken, code_id: CodeId) -> RepoResult<bool>;

    /// The subset of `ids` that `user` has claimed
    async fn claimed_among(&self, user: &UserToken, ids: &[CodeId]) -> RepoResult<HashSet<CodeId>>;

    /// Drop ledger history dated before `cutoff`, returns the rows removed
    async fn prune_before(&self, cutoff: CalendarDay) -> RepoResult<u64>;
}
