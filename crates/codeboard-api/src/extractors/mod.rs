//! Axum extractors for request handling
//!
//! Custom extractors for caller identity, path ids and validation.

mod identity;
mod path;
mod validated;

pub use identity::{UserIdentity, XUserId, X_USER_ID};
pub use path::CodeIdPath;
pub use validated::{ApiJson, ValidatedQuery};
