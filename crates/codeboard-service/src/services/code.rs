//! Code service
//!
//! Listing, posting and claiming codes.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use codeboard_core::entities::{Code, NewCode};
use codeboard_core::value_objects::{CodeId, UserToken};

use crate::dto::{CodeResponse, CodeView, CreateCodeRequest, ListCodesQuery};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Code service
pub struct CodeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CodeService<'a> {
    /// Create a new CodeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Active codes, oldest first, flagged for `viewer`
    #[instrument(skip(self), fields(viewer = %viewer))]
    pub async fn list_codes(
        &self,
        viewer: &UserToken,
        query: &ListCodesQuery,
    ) -> ServiceResult<Vec<CodeResponse>> {
        let max = self.ctx.policy().max_list_limit;
        if query.limit.is_some_and(|n| n > max) {
            return Err(ServiceError::validation(format!(
                "limit must be between 1 and {max}"
            )));
        }

        let limit = self.ctx.policy().list_limit(query.limit);
        let shared = self.shared_list().await?;
        let window = &shared[shared.len().saturating_sub(limit)..];

        let ids: Vec<CodeId> = window.iter().map(|code| code.id).collect();
        let claimed = self.ctx.ledger().claimed_among(viewer, &ids).await?;

        Ok(window
            .iter()
            .map(|code| CodeResponse::from(CodeView::new(code, viewer, claimed.contains(&code.id))))
            .collect())
    }

    /// Post a new code for `owner`
    ///
    /// Content is validated first (`TooLong`, `BadFormat`); the store then
    /// checks the post limit and duplicates atomically with the insert.
    #[instrument(skip(self, request), fields(owner = %owner))]
    pub async fn post_code(
        &self,
        owner: &UserToken,
        request: CreateCodeRequest,
    ) -> ServiceResult<CodeResponse> {
        let policy = self.ctx.policy();
        let core_code = policy.content.extract_core_code(&request.content)?;
        let draft = NewCode::new(request.content, core_code, owner.clone());

        let code = self
            .ctx
            .registry()
            .create(draft, self.ctx.stamp(), policy.limits, policy.initial_uses)
            .await?;
        self.ctx.list_cache().invalidate();

        info!(
            code_id = %code.id,
            owner = %owner,
            core_code = %code.core_code,
            "Code posted"
        );

        Ok(CodeResponse::from(CodeView::new(&code, owner, false)))
    }

    /// Claim one use of a code for `claimant`
    #[instrument(skip(self), fields(claimant = %claimant))]
    pub async fn claim_code(
        &self,
        claimant: &UserToken,
        code_id: CodeId,
    ) -> ServiceResult<CodeResponse> {
        let code = self
            .ctx
            .registry()
            .claim(code_id, claimant, self.ctx.stamp(), self.ctx.policy().limits)
            .await?;
        self.ctx.list_cache().invalidate();

        info!(
            code_id = %code.id,
            claimant = %claimant,
            remaining_uses = code.remaining_uses,
            "Code claimed"
        );

        Ok(CodeResponse::from(CodeView::new(&code, claimant, true)))
    }

    /// The shared list, from cache when fresh
    async fn shared_list(&self) -> ServiceResult<Arc<Vec<Code>>> {
        let cache = self.ctx.list_cache();
        if let Some(codes) = cache.get() {
            debug!(count = codes.len(), "Listing served from cache");
            return Ok(codes);
        }

        let generation = cache.generation();
        let codes = self
            .ctx
            .registry()
            .list_active(self.ctx.policy().max_list_limit)
            .await?;
        Ok(cache.store(generation, codes))
    }
}
