//! In-memory implementation of CodeRegistry and QuotaLedger
//!
//! Codes, the per-day ledger and the index of active core codes live behind
//! one mutex, so each post or claim is a single critical section.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::instrument;

use codeboard_core::entities::{Code, DailyQuota, NewCode};
use codeboard_core::error::DomainError;
use codeboard_core::rules::{ClaimFacts, PostFacts, QuotaLimits};
use codeboard_core::traits::{ActionStamp, CodeRegistry, QuotaLedger, RepoResult};
use codeboard_core::value_objects::{CalendarDay, CodeId, UserToken};

#[derive(Debug, Default)]
struct BoardState {
    /// Insertion order, which is also creation order
    codes: Vec<Code>,
    index: HashMap<CodeId, usize>,
    /// Core codes of codes with uses left
    active_cores: HashSet<String>,
    ledger: HashMap<UserToken, BTreeMap<CalendarDay, DailyQuota>>,
}

impl BoardState {
    fn quota(&self, user: &UserToken, day: CalendarDay) -> Option<&DailyQuota> {
        self.ledger.get(user).and_then(|days| days.get(&day))
    }

    fn quota_mut(&mut self, user: &UserToken, day: CalendarDay) -> &mut DailyQuota {
        self.ledger
            .entry(user.clone())
            .or_default()
            .entry(day)
            .or_default()
    }

    fn has_claimed(&self, user: &UserToken, code_id: CodeId) -> bool {
        self.ledger
            .get(user)
            .is_some_and(|days| days.values().any(|q| q.has_claimed(code_id)))
    }
}

/// Board store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryBoardStore {
    state: Mutex<BoardState>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of codes ever stored, exhausted ones included
    pub fn len(&self) -> usize {
        self.state.lock().codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CodeRegistry for MemoryBoardStore {
    #[instrument(skip(self))]
    async fn list_active(&self, limit: usize) -> RepoResult<Vec<Code>> {
        let state = self.state.lock();
        let mut recent: Vec<Code> = state
            .codes
            .iter()
            .rev()
            .filter(|code| code.is_active())
            .take(limit)
            .cloned()
            .collect();
        recent.reverse();
        Ok(recent)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: CodeId) -> RepoResult<Option<Code>> {
        let state = self.state.lock();
        Ok(state.index.get(&id).map(|&i| state.codes[i].clone()))
    }

    #[instrument(skip(self, draft), fields(owner = %draft.owner))]
    async fn create(
        &self,
        draft: NewCode,
        stamp: ActionStamp,
        limits: QuotaLimits,
        initial_uses: u32,
    ) -> RepoResult<Code> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        limits.check_post(PostFacts {
            posts_today: state
                .quota(&draft.owner, stamp.day)
                .map_or(0, |q| q.posts_made),
            duplicate: state.active_cores.contains(&draft.core_code),
        })?;

        let code = Code::create(draft, initial_uses, stamp.at, stamp.day);
        state.index.insert(code.id, state.codes.len());
        if code.is_active() {
            state.active_cores.insert(code.core_code.clone());
        }
        state.codes.push(code.clone());
        state.quota_mut(&code.owner, stamp.day).record_post();

        Ok(code)
    }

    #[instrument(skip(self, claimant), fields(claimant = %claimant))]
    async fn claim(
        &self,
        id: CodeId,
        claimant: &UserToken,
        stamp: ActionStamp,
        limits: QuotaLimits,
    ) -> RepoResult<Code> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let slot = state.index.get(&id).copied();
        limits.check_claim(
            claimant,
            ClaimFacts {
                code_id: id,
                code: slot.map(|i| &state.codes[i]),
                claims_today: state
                    .quota(claimant, stamp.day)
                    .map_or(0, DailyQuota::claim_count),
                already_claimed: state.has_claimed(claimant, id),
            },
        )?;
        let index = slot.ok_or(DomainError::CodeNotFound(id))?;

        let code = &mut state.codes[index];
        code.consume_use()?;
        let claimed = code.clone();
        if claimed.is_exhausted() {
            state.active_cores.remove(&claimed.core_code);
        }
        state.quota_mut(claimant, stamp.day).record_claim(id);

        Ok(claimed)
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

#[async_trait]
impl QuotaLedger for MemoryBoardStore {
    async fn post_count(&self, user: &UserToken, day: CalendarDay) -> RepoResult<u32> {
        Ok(self
            .state
            .lock()
            .quota(user, day)
            .map_or(0, |q| q.posts_made))
    }

    async fn claim_count(&self, user: &UserToken, day: CalendarDay) -> RepoResult<u32> {
        Ok(self
            .state
            .lock()
            .quota(user, day)
            .map_or(0, DailyQuota::claim_count))
    }

    async fn has_claimed(&self, user: &UserToken, code_id: CodeId) -> RepoResult<bool> {
        Ok(self.state.lock().has_claimed(user, code_id))
    }

    async fn claimed_among(
        &self,
        user: &UserToken,
        ids: &[CodeId],
    ) -> RepoResult<HashSet<CodeId>> {
        let state = self.state.lock();
        let Some(days) = state.ledger.get(user) else {
            return Ok(HashSet::new());
        };
        Ok(ids
            .iter()
            .copied()
            .filter(|&id| days.values().any(|q| q.has_claimed(id)))
            .collect())
    }

    #[instrument(skip(self))]
    async fn prune_before(&self, cutoff: CalendarDay) -> RepoResult<u64> {
        let mut state = self.state.lock();
        let mut removed = 0u64;
        state.ledger.retain(|_, days| {
            let kept = days.split_off(&cutoff);
            removed += days.len() as u64;
            *days = kept;
            !days.is_empty()
        });
        Ok(removed)
    }
}
