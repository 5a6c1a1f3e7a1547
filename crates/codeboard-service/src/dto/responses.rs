//! Response DTOs for API endpoints
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A code as seen by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeResponse {
    pub id: String,
    pub content: String,
    pub remaining_uses: u32,
    /// Epoch milliseconds
    pub created_at: i64,
    pub is_own_code: bool,
    pub already_used: bool,
}

/// Today's usage for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub today_post_count: u32,
    pub today_claim_count: u32,
    pub post_limit: u32,
    pub claim_limit: u32,
}

// ============================================================================
// Health Check Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub storage: String,
}

impl ReadinessResponse {
    pub fn ready(storage_healthy: bool) -> Self {
        Self {
            status: if storage_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                storage: if storage_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
