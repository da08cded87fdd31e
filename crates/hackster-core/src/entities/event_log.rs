//! Event log entity - append-only audit of processing outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::RecordStatus;
use crate::error::DomainError;
use crate::events::EventKind;
use crate::value_objects::Snowflake;

/// Terminal outcome of processing one event occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    /// The record mutation took effect
    Applied,
    /// An applied entry for the same occurrence already existed
    SkippedDuplicate,
    /// The event had no edge from the record's current state
    SkippedNoop,
    /// Processing failed terminally (validation or exhausted retries)
    Failed,
}

impl EventOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::SkippedDuplicate => "skipped_duplicate",
            Self::SkippedNoop => "skipped_noop",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventOutcome {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(Self::Applied),
            "skipped_duplicate" => Ok(Self::SkippedDuplicate),
            "skipped_noop" => Ok(Self::SkippedNoop),
            "failed" => Ok(Self::Failed),
            other => Err(DomainError::ValidationError(format!(
                "unknown event outcome: {other}"
            ))),
        }
    }
}

/// Where an event occurrence entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    /// Chat platform gateway
    Gateway,
    /// Manual operation through the HTTP API
    Api,
    /// Requeued after a restart or stale-claim sweep
    Recovery,
}

impl EventOrigin {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::Api => "api",
            Self::Recovery => "recovery",
        }
    }
}

impl fmt::Display for EventOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventOrigin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gateway" => Ok(Self::Gateway),
            "api" => Ok(Self::Api),
            "recovery" => Ok(Self::Recovery),
            other => Err(DomainError::ValidationError(format!(
                "unknown event origin: {other}"
            ))),
        }
    }
}

/// One row of the append-only event log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: i64,
    pub event_kind: EventKind,
    pub source_id: Snowflake,
    pub dedup_token: String,
    pub outcome: EventOutcome,
    pub status_before: Option<RecordStatus>,
    pub status_after: Option<RecordStatus>,
    pub detail: Option<String>,
    pub origin: EventOrigin,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a new log entry (id and timestamp are database-assigned)
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub event_kind: EventKind,
    pub source_id: Snowflake,
    pub dedup_token: String,
    pub outcome: EventOutcome,
    pub status_before: Option<RecordStatus>,
    pub status_after: Option<RecordStatus>,
    pub detail: Option<String>,
    pub origin: EventOrigin,
}
