//! Business logic services
//!
//! Services borrow a [`ServiceContext`] per call and orchestrate the rule
//! checks in `codeboard-core` with the atomic store operations behind it.

pub mod cache;
pub mod code;
pub mod context;
pub mod error;
pub mod quota;

// Re-export all services for convenience
pub use cache::ListCache;
pub use code::CodeService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use quota::QuotaService;
