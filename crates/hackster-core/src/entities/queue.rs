//! Queued event entity - durable in-flight state of the inbound queue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::EventOrigin;
use crate::error::DomainError;
use crate::events::{ChatEvent, EventKind};
use crate::value_objects::Snowflake;

/// Queue row state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueState {
    /// Waiting to be claimed (possibly delayed by backoff)
    Pending,
    /// Claimed by a worker
    Processing,
}

impl QueueState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
        }
    }
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QueueState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            other => Err(DomainError::ValidationError(format!(
                "unknown queue state: {other}"
            ))),
        }
    }
}

/// One row of the inbound event queue
///
/// Rows live from ingest until a terminal outcome, then are deleted; the
/// audit trail is the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedEvent {
    pub id: i64,
    pub event_kind: EventKind,
    pub source_id: Snowflake,
    pub dedup_token: String,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
    pub state: QueueState,
    pub attempts: i32,
    pub run_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub origin: EventOrigin,
    pub created_at: DateTime<Utc>,
}

impl QueuedEvent {
    /// Rebuild the chat event this row was enqueued from
    pub fn to_event(&self) -> ChatEvent {
        ChatEvent {
            kind: self.event_kind,
            source_id: self.source_id,
            dedup_token: self.dedup_token.clone(),
            payload: self.payload.clone(),
            received_at: self.received_at,
        }
    }
}
