//! Dead letter database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the dead_letters table
#[derive(Debug, Clone, FromRow)]
pub struct DeadLetterModel {
    pub id: i64,
    pub event_kind: String,
    pub source_id: i64,
    pub dedup_token: String,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
    pub attempts: i32,
    pub last_error: String,
    pub created_at: DateTime<Utc>,
}
