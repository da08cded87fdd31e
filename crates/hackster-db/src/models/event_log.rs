//! Event log database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the append-only event_log table
#[derive(Debug, Clone, FromRow)]
pub struct EventLogModel {
    pub id: i64,
    pub event_kind: String,
    pub source_id: i64,
    pub dedup_token: String,
    pub outcome: String,
    pub status_before: Option<String>,
    pub status_after: Option<String>,
    pub detail: Option<String>,
    pub origin: String,
    pub created_at: DateTime<Utc>,
}
