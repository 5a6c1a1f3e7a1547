//! Daily quota entity - one user's activity on one calendar day

use std::collections::HashSet;

use crate::value_objects::CodeId;

/// Posts made and codes claimed by a user on a single day
///
/// Created lazily on the first action of the day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyQuota {
    pub posts_made: u32,
    pub claimed: HashSet<CodeId>,
}

impl DailyQuota {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of codes claimed on this day
    pub fn claim_count(&self) -> u32 {
        u32::try_from(self.claimed.len()).unwrap_or(u32::MAX)
    }

    pub fn has_claimed(&self, code_id: CodeId) -> bool {
        self.claimed.contains(&code_id)
    }

    pub fn record_post(&mut self) {
        self.posts_made = self.posts_made.saturating_add(1);
    }

    /// Add a claim, returns false if the code was already in the set
    pub fn record_claim(&mut self, code_id: CodeId) -> bool {
        self.claimed.insert(code_id)
    }
}
