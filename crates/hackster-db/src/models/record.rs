//! Member record database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the member_records table
#[derive(Debug, Clone, FromRow)]
pub struct MemberRecordModel {
    pub id: i64,
    pub username: Option<String>,
    pub status: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
