//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests. Every generator
//! produces ids unique across processes sharing one database, so tests
//! never interfere with each other or with earlier runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use chrono::Utc;
use hackster_core::events::{ChatEvent, EventKind};
use hackster_core::Snowflake;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A snowflake id unique across test runs sharing one database
pub fn unique_snowflake() -> Snowflake {
    static BASE: OnceLock<i64> = OnceLock::new();
    let base = *BASE.get_or_init(|| Utc::now().timestamp_millis() << 12);
    let offset = i64::try_from(unique_suffix()).unwrap_or_default();
    Snowflake::new(base + offset)
}

/// Dedup token for a fresh occurrence. Redelivery tests clone the event
/// instead of calling this twice.
pub fn unique_token(action: &str, source_id: Snowflake) -> String {
    format!("{action}:{source_id}:{}", Uuid::new_v4())
}

fn event(kind: EventKind, action: &str, source_id: Snowflake) -> ChatEvent {
    let suffix = unique_suffix();
    ChatEvent::new(
        kind,
        source_id,
        unique_token(action, source_id),
        json!({ "username": format!("testuser{suffix}") }),
    )
}

/// A member joined
pub fn join_event(source_id: Snowflake) -> ChatEvent {
    event(EventKind::Join, "join", source_id)
}

/// A member posted a message
pub fn message_event(source_id: Snowflake) -> ChatEvent {
    event(EventKind::Message, "message", source_id)
}

/// A member was flagged
pub fn flag_event(source_id: Snowflake) -> ChatEvent {
    event(EventKind::Flag, "flag", source_id)
}

/// A member left
pub fn retire_event(source_id: Snowflake) -> ChatEvent {
    event(EventKind::Retire, "retire", source_id)
}

/// Status override request
#[derive(Debug, Serialize)]
pub struct OverrideRequest {
    pub status: String,
    pub reason: Option<String>,
}

impl OverrideRequest {
    pub fn to(status: &str) -> Self {
        Self {
            status: status.to_string(),
            reason: Some("operator review".to_string()),
        }
    }
}

/// Report submission request
#[derive(Debug, Serialize)]
pub struct ReportRequest {
    pub reporter_id: String,
    pub subject_id: Option<String>,
    pub body: String,
}

impl ReportRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            reporter_id: unique_snowflake().to_string(),
            subject_id: Some(unique_snowflake().to_string()),
            body: format!("spamming invite links in #general ({suffix})"),
        }
    }
}

/// Record response
#[derive(Debug, Deserialize)]
pub struct RecordJson {
    pub id: String,
    pub username: Option<String>,
    pub status: String,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Transition response
#[derive(Debug, Deserialize)]
pub struct TransitionJson {
    pub outcome: String,
    pub status_before: Option<String>,
    pub status_after: Option<String>,
    pub record: Option<RecordJson>,
}

/// One audit log entry
#[derive(Debug, Deserialize)]
pub struct EventEntryJson {
    pub id: i64,
    #[serde(rename = "type")]
    pub event_kind: String,
    pub source_id: String,
    pub dedup_token: String,
    pub outcome: String,
    pub status_before: Option<String>,
    pub status_after: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    pub origin: String,
    pub created_at: String,
}

/// One dead-lettered event
#[derive(Debug, Deserialize)]
pub struct DeadLetterJson {
    pub id: i64,
    #[serde(rename = "type")]
    pub event_kind: String,
    pub source_id: String,
    pub dedup_token: String,
    pub payload: serde_json::Value,
    pub received_at: String,
    pub attempts: i32,
    pub last_error: String,
    pub created_at: String,
}

/// Report response
#[derive(Debug, Deserialize)]
pub struct ReportJson {
    pub id: i64,
    pub reporter_id: String,
    pub subject_id: Option<String>,
    pub body: String,
    pub created_at: String,
}

/// Per-status record counts
#[derive(Debug, Deserialize)]
pub struct StatsJson {
    pub total: i64,
    pub new: i64,
    pub active: i64,
    pub flagged: i64,
    pub retired: i64,
}

/// Bounded list response
#[derive(Debug, Deserialize)]
pub struct ListJson<T> {
    pub data: Vec<T>,
    pub limit: i64,
    pub offset: i64,
}

/// Health response
#[derive(Debug, Deserialize)]
pub struct HealthJson {
    pub status: String,
    pub version: String,
    pub checks: HealthChecksJson,
}

#[derive(Debug, Deserialize)]
pub struct HealthChecksJson {
    pub database: String,
}

/// Error response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
