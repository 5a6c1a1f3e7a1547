//! Business rules shared by every storage backend

mod content;
mod policy;
mod quota;

pub use content::{ContentRules, MatchMode};
pub use policy::BoardPolicy;
pub use quota::{ClaimFacts, PostFacts, QuotaLimits};
