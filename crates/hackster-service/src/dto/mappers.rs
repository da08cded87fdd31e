//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use hackster_core::entities::{DeadLetter, EventLogEntry, MemberRecord, Report};
use hackster_core::transitions::TransitionReceipt;

use super::responses::{
    DeadLetterResponse, EventEntryResponse, RecordResponse, ReportResponse, TransitionResponse,
};

// ============================================================================
// Record Mappers
// ============================================================================

impl From<&MemberRecord> for RecordResponse {
    fn from(record: &MemberRecord) -> Self {
        Self {
            id: record.id.to_string(),
            username: record.username.clone(),
            status: record.status,
            version: record.version,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<MemberRecord> for RecordResponse {
    fn from(record: MemberRecord) -> Self {
        Self::from(&record)
    }
}

impl From<TransitionReceipt> for TransitionResponse {
    fn from(receipt: TransitionReceipt) -> Self {
        Self {
            outcome: receipt.outcome,
            status_before: receipt.status_before,
            status_after: receipt.status_after,
            record: receipt.record.map(RecordResponse::from),
        }
    }
}

// ============================================================================
// Event Log Mappers
// ============================================================================

impl From<&EventLogEntry> for EventEntryResponse {
    fn from(entry: &EventLogEntry) -> Self {
        Self {
            id: entry.id,
            event_kind: entry.event_kind,
            source_id: entry.source_id.to_string(),
            dedup_token: entry.dedup_token.clone(),
            outcome: entry.outcome,
            status_before: entry.status_before,
            status_after: entry.status_after,
            detail: entry.detail.clone(),
            origin: entry.origin,
            created_at: entry.created_at,
        }
    }
}

impl From<EventLogEntry> for EventEntryResponse {
    fn from(entry: EventLogEntry) -> Self {
        Self::from(&entry)
    }
}

impl From<&DeadLetter> for DeadLetterResponse {
    fn from(letter: &DeadLetter) -> Self {
        Self {
            id: letter.id,
            event_kind: letter.event_kind,
            source_id: letter.source_id.to_string(),
            dedup_token: letter.dedup_token.clone(),
            payload: letter.payload.clone(),
            received_at: letter.received_at,
            attempts: letter.attempts,
            last_error: letter.last_error.clone(),
            created_at: letter.created_at,
        }
    }
}

impl From<DeadLetter> for DeadLetterResponse {
    fn from(letter: DeadLetter) -> Self {
        Self::from(&letter)
    }
}

// ============================================================================
// Report Mappers
// ============================================================================

impl From<&Report> for ReportResponse {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id,
            reporter_id: report.reporter_id.to_string(),
            subject_id: report.subject_id.map(|id| id.to_string()),
            body: report.body.clone(),
            created_at: report.created_at,
        }
    }
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self::from(&report)
    }
}
