//! Dead letter entity - terminally failed events kept for inspection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::EventKind;
use crate::value_objects::Snowflake;

/// An event that exhausted its retry budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetter {
    pub id: i64,
    pub event_kind: EventKind,
    pub source_id: Snowflake,
    pub dedup_token: String,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
    pub attempts: i32,
    pub last_error: String,
    pub created_at: DateTime<Utc>,
}
