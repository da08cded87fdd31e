//! Event queue database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the event_queue table
#[derive(Debug, Clone, FromRow)]
pub struct EventQueueModel {
    pub id: i64,
    pub event_kind: String,
    pub source_id: i64,
    pub dedup_token: String,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
    pub state: String,
    pub attempts: i32,
    pub run_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub origin: String,
    pub created_at: DateTime<Utc>,
}
