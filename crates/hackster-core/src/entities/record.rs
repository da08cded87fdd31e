//! Member record entity - the tracked state of one community member

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Lifecycle status of a member record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// First observed, no qualifying activity yet
    New,
    /// Participating member in good standing
    Active,
    /// Under moderation review
    Flagged,
    /// Left or was removed from the community
    Retired,
}

impl RecordStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Active => "active",
            Self::Flagged => "flagged",
            Self::Retired => "retired",
        }
    }

    /// All statuses, in lifecycle order
    pub const ALL: [RecordStatus; 4] = [Self::New, Self::Active, Self::Flagged, Self::Retired];
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "active" => Ok(Self::Active),
            "flagged" => Ok(Self::Flagged),
            "retired" => Ok(Self::Retired),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

/// A tracked community member
///
/// `id` is the platform-assigned snowflake and never changes. `version` is an
/// optimistic concurrency counter: every status write increments it, and
/// writers must match the version they read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: Snowflake,
    pub username: Option<String>,
    pub status: RecordStatus,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemberRecord {
    /// Create a fresh record for a first observation
    pub fn new(id: Snowflake, username: Option<String>, status: RecordStatus) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            status,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_retired(&self) -> bool {
        self.status == RecordStatus::Retired
    }

    pub fn is_flagged(&self) -> bool {
        self.status == RecordStatus::Flagged
    }
}
