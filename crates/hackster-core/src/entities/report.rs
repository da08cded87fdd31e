//! Report entity - moderation reports submitted by members or operators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Maximum report body length, matching the platform message limit
pub const MAX_REPORT_LENGTH: usize = 2000;

/// A stored moderation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub reporter_id: Snowflake,
    pub subject_id: Option<Snowflake>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a new report; `body` must already be sanitized
#[derive(Debug, Clone)]
pub struct NewReport {
    pub reporter_id: Snowflake,
    pub subject_id: Option<Snowflake>,
    pub body: String,
}
