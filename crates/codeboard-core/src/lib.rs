//! # codeboard-core
//!
//! Domain layer containing entities, value objects, the post/claim rules and
//! the storage traits. This crate has zero dependencies on infrastructure
//! (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod rules;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Code, DailyQuota, NewCode};
pub use error::{DomainError, ErrorKind};
pub use rules::{BoardPolicy, ClaimFacts, ContentRules, MatchMode, PostFacts, QuotaLimits};
pub use traits::{
    ActionStamp, Clock, CodeRegistry, ManualClock, QuotaLedger, RepoResult, SystemClock,
};
pub use value_objects::{
    CalendarDay, CodeId, CodeIdParseError, DayBoundary, DayBoundaryParseError, UserToken,
    UserTokenError,
};
