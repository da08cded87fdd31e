//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use hackster_core::entities::{EventOrigin, EventOutcome, RecordStatus};
use hackster_core::events::EventKind;
use hackster_core::transitions::TransitionOutcome;
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Bounded list response with the paging values that produced it
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub limit: i64,
    pub offset: i64,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, limit: i64, offset: i64) -> Self {
        Self {
            data,
            limit,
            offset,
        }
    }
}

// ============================================================================
// Record Responses
// ============================================================================

/// A tracked member record
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    pub id: String,
    pub username: Option<String>,
    pub status: RecordStatus,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of routing one event (or override) through the state machine
#[derive(Debug, Clone, Serialize)]
pub struct TransitionResponse {
    pub outcome: TransitionOutcome,
    pub status_before: Option<RecordStatus>,
    pub status_after: Option<RecordStatus>,
    pub record: Option<RecordResponse>,
}

/// Per-status record counts
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecordStatsResponse {
    pub total: i64,
    pub new: i64,
    pub active: i64,
    pub flagged: i64,
    pub retired: i64,
}

// ============================================================================
// Event Log Responses
// ============================================================================

/// One audit log row for a record
#[derive(Debug, Clone, Serialize)]
pub struct EventEntryResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub event_kind: EventKind,
    pub source_id: String,
    pub dedup_token: String,
    pub outcome: EventOutcome,
    pub status_before: Option<RecordStatus>,
    pub status_after: Option<RecordStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub origin: EventOrigin,
    pub created_at: DateTime<Utc>,
}

/// One parked event that exhausted its delivery attempts
#[derive(Debug, Clone, Serialize)]
pub struct DeadLetterResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub event_kind: EventKind,
    pub source_id: String,
    pub dedup_token: String,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
    pub attempts: i32,
    pub last_error: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Report Responses
// ============================================================================

/// A submitted member report
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: i64,
    pub reporter_id: String,
    pub subject_id: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl HealthResponse {
    pub fn evaluate(database_healthy: bool, version: impl Into<String>) -> Self {
        Self {
            status: if database_healthy { "healthy" } else { "degraded" }.to_string(),
            version: version.into(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
