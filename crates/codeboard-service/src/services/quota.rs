//! Quota service
//!
//! Read side of the quota ledger plus history pruning.

use tracing::{info, instrument};

use codeboard_core::value_objects::{CodeId, UserToken};

use crate::dto::StatsResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Quota service
pub struct QuotaService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> QuotaService<'a> {
    /// Create a new QuotaService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Codes posted by `user` today
    pub async fn post_count_today(&self, user: &UserToken) -> ServiceResult<u32> {
        Ok(self.ctx.ledger().post_count(user, self.ctx.today()).await?)
    }

    /// Codes claimed by `user` today
    pub async fn claim_count_today(&self, user: &UserToken) -> ServiceResult<u32> {
        Ok(self.ctx.ledger().claim_count(user, self.ctx.today()).await?)
    }

    /// Whether `user` ever claimed `code_id` within retained history
    pub async fn has_claimed(&self, user: &UserToken, code_id: CodeId) -> ServiceResult<bool> {
        Ok(self.ctx.ledger().has_claimed(user, code_id).await?)
    }

    /// Today's counters and the limits they run against
    #[instrument(skip(self), fields(user = %user))]
    pub async fn get_stats(&self, user: &UserToken) -> ServiceResult<StatsResponse> {
        let today = self.ctx.today();
        let ledger = self.ctx.ledger();
        let limits = self.ctx.policy().limits;

        Ok(StatsResponse {
            today_post_count: ledger.post_count(user, today).await?,
            today_claim_count: ledger.claim_count(user, today).await?,
            post_limit: limits.post_daily_limit,
            claim_limit: limits.claim_daily_limit,
        })
    }

    /// Delete ledger history outside the retention window
    ///
    /// Returns the number of rows removed; 0 when retention is unlimited.
    #[instrument(skip(self))]
    pub async fn prune_history(&self) -> ServiceResult<u64> {
        let Some(cutoff) = self.ctx.policy().retention_cutoff(self.ctx.today()) else {
            return Ok(0);
        };

        let removed = self.ctx.ledger().prune_before(cutoff).await?;
        if removed > 0 {
            info!(cutoff = %cutoff, removed, "Pruned ledger history");
        }
        Ok(removed)
    }
}
