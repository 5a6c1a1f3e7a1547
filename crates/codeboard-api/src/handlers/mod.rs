//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod codes;
pub mod health;
pub mod users;
