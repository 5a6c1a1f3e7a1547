//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A user id no other test (or earlier run) uses
pub fn unique_user() -> String {
    format!("it-user-{}", Uuid::new_v4().simple())
}

/// A postable code whose core part is unique across runs
pub fn unique_code() -> String {
    let token = Uuid::new_v4().simple().to_string().to_uppercase();
    format!(
        "HB{:04} red:/{}",
        unique_suffix() % 10_000,
        &token[..12]
    )
}

/// Post request body
#[derive(Debug, Serialize)]
pub struct CreateCodeRequest {
    pub content: String,
}

impl CreateCodeRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn unique() -> Self {
        Self::new(unique_code())
    }
}

/// Code item as returned by the board
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeItem {
    pub id: String,
    pub content: String,
    pub remaining_uses: u32,
    pub created_at: i64,
    pub is_own_code: bool,
    pub already_used: bool,
}

/// Per-user statistics
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub today_post_count: u32,
    pub today_claim_count: u32,
    pub post_limit: u32,
    pub claim_limit: u32,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub kind: String,
    pub message: String,
}
