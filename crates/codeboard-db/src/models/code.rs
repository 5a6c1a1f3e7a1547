//! Code database model

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for codes table
#[derive(Debug, Clone, FromRow)]
pub struct CodeModel {
    pub id: Uuid,
    pub content: String,
    pub core_code: String,
    pub owner_token: String,
    pub remaining_uses: i32,
    pub created_at: DateTime<Utc>,
    pub posted_on: NaiveDate,
}
