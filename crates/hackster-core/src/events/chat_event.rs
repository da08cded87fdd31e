//! Chat event - the normalized inbound unit the bridge consumes
//!
//! Every gateway or API occurrence is reduced to this shape before it touches
//! the queue. The payload is opaque to the state machine; only `kind`,
//! `source_id`, and the dedup token drive processing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Kinds of events the bridge understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Member joined the community
    Join,
    /// Member posted a message (activity signal)
    Message,
    /// Member was flagged for moderation (ban, report escalation)
    Flag,
    /// A flag was lifted (unban, infraction removed)
    Clear,
    /// Member left or was removed
    Retire,
    /// Retired member restored by an operator
    Reinstate,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Message => "message",
            Self::Flag => "flag",
            Self::Clear => "clear",
            Self::Retire => "retire",
            Self::Reinstate => "reinstate",
        }
    }

    /// All kinds, for exhaustive table tests
    pub const ALL: [EventKind; 6] = [
        Self::Join,
        Self::Message,
        Self::Flag,
        Self::Clear,
        Self::Retire,
        Self::Reinstate,
    ];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "join" => Ok(Self::Join),
            "message" => Ok(Self::Message),
            "flag" => Ok(Self::Flag),
            "clear" => Ok(Self::Clear),
            "retire" => Ok(Self::Retire),
            "reinstate" => Ok(Self::Reinstate),
            other => Err(DomainError::InvalidEventKind(other.to_string())),
        }
    }
}

/// A normalized inbound event occurrence
///
/// `dedup_token` identifies the occurrence: the platform-provided id where
/// one exists (message id, composite member-event id), a fresh UUID for
/// API-originated commands. Redelivery of the same occurrence carries the
/// same token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub source_id: Snowflake,
    pub dedup_token: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

impl ChatEvent {
    pub fn new(
        kind: EventKind,
        source_id: Snowflake,
        dedup_token: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            kind,
            source_id,
            dedup_token: dedup_token.into(),
            payload,
            received_at: Utc::now(),
        }
    }

    /// Display name carried in the payload, if the platform provided one
    pub fn username(&self) -> Option<&str> {
        self.payload.get("username").and_then(|v| v.as_str())
    }
}
