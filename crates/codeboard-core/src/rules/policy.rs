//! Board policy - process-wide configuration of the rules

use crate::value_objects::{CalendarDay, DayBoundary};

use super::content::ContentRules;
use super::quota::QuotaLimits;

/// All tunables of the board, shared by every user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPolicy {
    pub limits: QuotaLimits,
    /// Uses a freshly posted code starts with
    pub initial_uses: u32,
    pub content: ContentRules,
    pub day_boundary: DayBoundary,
    /// Upper bound on codes returned by a listing
    pub max_list_limit: usize,
    /// Days of ledger history kept; 0 keeps everything
    pub history_retention_days: u32,
}

impl Default for BoardPolicy {
    fn default() -> Self {
        Self {
            limits: QuotaLimits::default(),
            initial_uses: 10,
            content: ContentRules::default(),
            day_boundary: DayBoundary::default(),
            max_list_limit: 100,
            history_retention_days: 30,
        }
    }
}

impl BoardPolicy {
    /// First day still covered by the retention window, `None` when history
    /// is kept forever
    pub fn retention_cutoff(&self, today: CalendarDay) -> Option<CalendarDay> {
        (self.history_retention_days > 0).then(|| today.days_before(self.history_retention_days))
    }

    /// Clamp a requested listing size into `1..=max_list_limit`
    pub fn list_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.max_list_limit)
            .clamp(1, self.max_list_limit.max(1))
    }
}
