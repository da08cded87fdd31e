//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::entities::{
    DeadLetter, EventLogEntry, EventOrigin, MemberRecord, NewReport, QueuedEvent, RecordStatus,
    Report,
};
use crate::error::DomainError;
use crate::events::ChatEvent;
use crate::transitions::{TransitionCommand, TransitionReceipt};
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Record Repository
// ============================================================================

/// Filter for record scans
///
/// `limit` is always explicit; there is no implicit default at this layer.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    pub status: Option<RecordStatus>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Find record by platform id
    async fn find(&self, id: Snowflake) -> RepoResult<Option<MemberRecord>>;

    /// List records matching the filter, newest first
    async fn list(&self, filter: RecordFilter) -> RepoResult<Vec<MemberRecord>>;

    /// Count records, optionally restricted to one status
    async fn count(&self, status: Option<RecordStatus>) -> RepoResult<i64>;
}

// ============================================================================
// Event Log Repository
// ============================================================================

/// Read side of the append-only event log.
///
/// There is deliberately no `append` here: every log insert happens inside
/// a transaction owned by the transition store or the queue's failure paths.
#[async_trait]
pub trait EventLogRepository: Send + Sync {
    /// Audit trail for one source, newest first
    async fn list_for_source(&self, source_id: Snowflake, limit: i64)
        -> RepoResult<Vec<EventLogEntry>>;
}

// ============================================================================
// Event Queue Repository
// ============================================================================

#[async_trait]
pub trait EventQueueRepository: Send + Sync {
    /// Persist an inbound event for processing
    async fn enqueue(&self, event: &ChatEvent, origin: EventOrigin) -> RepoResult<QueuedEvent>;

    /// Claim the oldest eligible pending event and mark it processing.
    ///
    /// An event is eligible only when it is due (`run_at` reached) and no
    /// older queue row exists for the same source in any state. That guard is
    /// what keeps per-source delivery ordered even across backoff delays.
    async fn claim(&self) -> RepoResult<Option<QueuedEvent>>;

    /// Success path: drop the row (its audit entry was written by the
    /// transition store inside the same processing pass)
    async fn ack(&self, queue_id: i64) -> RepoResult<()>;

    /// Transient failure: return the row to pending with a backoff schedule
    async fn release(
        &self,
        queue_id: i64,
        next_run_at: DateTime<Utc>,
        error: &str,
    ) -> RepoResult<()>;

    /// Retry budget exhausted: move the row to dead letters and write the
    /// failed audit entry, atomically
    async fn bury(&self, event: &QueuedEvent, error: &str) -> RepoResult<()>;

    /// Permanent validation failure: write the failed audit entry and drop
    /// the row. Not dead-lettered; replaying an invalid payload cannot help.
    async fn reject(&self, event: &QueuedEvent, error: &str) -> RepoResult<()>;

    /// Return processing rows claimed longer ago than `older_than` to
    /// pending. Run at startup and periodically to recover from crashes.
    async fn requeue_stale(&self, older_than: Duration) -> RepoResult<u64>;

    /// Rows currently pending or processing (queue depth gauge)
    async fn depth(&self) -> RepoResult<i64>;
}

// ============================================================================
// Dead Letter Repository
// ============================================================================

#[async_trait]
pub trait DeadLetterRepository: Send + Sync {
    /// List dead letters, newest first
    async fn list(&self, limit: i64) -> RepoResult<Vec<DeadLetter>>;
}

// ============================================================================
// Report Repository
// ============================================================================

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Store a sanitized report
    async fn create(&self, report: &NewReport) -> RepoResult<Report>;

    /// List reports, newest first
    async fn list(&self, limit: i64) -> RepoResult<Vec<Report>>;
}

// ============================================================================
// Transition Store
// ============================================================================

/// The transactional unit of work for applying one event occurrence.
///
/// Implementations must, in a single transaction: detect duplicates against
/// applied log entries, load the record, evaluate [`crate::transitions::step`],
/// upsert the record with a version guard, and append exactly one log entry.
/// A version-guard miss surfaces as [`DomainError::StaleRecord`]; the caller
/// decides whether to retry with fresh state.
#[async_trait]
pub trait TransitionStore: Send + Sync {
    async fn apply(&self, cmd: &TransitionCommand) -> RepoResult<TransitionReceipt>;
}
