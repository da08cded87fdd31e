//! Record state machine
//!
//! The single place transitions are evaluated. Both the gateway worker path
//! and manual API overrides go through [`step`]; there is no second copy of
//! these rules anywhere.
//!
//! Rules:
//! - A record is created on first observation of its source, whatever the
//!   event kind. Kinds with no edge from `new` still create the row and are
//!   recorded as no-ops.
//! - An event with no edge from the current state is a no-op, never an error.
//! - `join` on a retired record reinstates it (re-join after retirement).

use serde::{Deserialize, Serialize};

use crate::entities::{EventOrigin, MemberRecord, RecordStatus};
use crate::events::EventKind;
use crate::value_objects::Snowflake;

/// What the state machine decided for one event against one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// First observation; insert the row in this status, event is applied
    Create { status: RecordStatus },
    /// First observation by a kind with no edge from `new`; insert the row
    /// as `new`, record the event as a no-op
    CreateNoop,
    /// Existing record moves along an edge
    Apply {
        from: RecordStatus,
        to: RecordStatus,
    },
    /// No edge from the current state; nothing changes
    Noop { current: RecordStatus },
}

/// Evaluate one event kind against the current record state
#[must_use]
pub fn step(current: Option<RecordStatus>, kind: EventKind) -> Step {
    use EventKind as K;
    use RecordStatus as S;

    let Some(current) = current else {
        return match kind {
            K::Join => Step::Create { status: S::New },
            K::Message => Step::Create { status: S::Active },
            K::Flag => Step::Create { status: S::Flagged },
            K::Retire => Step::Create { status: S::Retired },
            K::Clear | K::Reinstate => Step::CreateNoop,
        };
    };

    let next = match (current, kind) {
        (S::New, K::Message) => Some(S::Active),
        (S::New | S::Active, K::Flag) => Some(S::Flagged),
        (S::Flagged, K::Clear) => Some(S::Active),
        (S::New | S::Active | S::Flagged, K::Retire) => Some(S::Retired),
        (S::Retired, K::Join | K::Reinstate) => Some(S::Active),
        _ => None,
    };

    match next {
        Some(to) => Step::Apply { from: current, to },
        None => Step::Noop { current },
    }
}

/// Map a manual status override target onto the event kind that expresses it
///
/// Returns `None` for targets no event can reach (`new` has no inbound edge).
#[must_use]
pub fn kind_for_override(current: RecordStatus, target: RecordStatus) -> Option<EventKind> {
    match target {
        RecordStatus::New => None,
        RecordStatus::Flagged => Some(EventKind::Flag),
        RecordStatus::Retired => Some(EventKind::Retire),
        RecordStatus::Active => {
            if current == RecordStatus::Retired {
                Some(EventKind::Reinstate)
            } else {
                Some(EventKind::Clear)
            }
        }
    }
}

/// What the transition pipeline consumes: one event occurrence reduced to
/// the fields the state machine and audit log need
#[derive(Debug, Clone)]
pub struct TransitionCommand {
    pub kind: EventKind,
    pub source_id: Snowflake,
    pub dedup_token: String,
    pub username: Option<String>,
    pub origin: EventOrigin,
    pub detail: Option<String>,
}

/// Outcome of one pipeline run, as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOutcome {
    Applied,
    SkippedDuplicate,
    SkippedNoop,
}

impl TransitionOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::SkippedDuplicate => "skipped_duplicate",
            Self::SkippedNoop => "skipped_noop",
        }
    }
}

/// Receipt returned by the transition store after the transaction commits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionReceipt {
    pub outcome: TransitionOutcome,
    pub status_before: Option<RecordStatus>,
    pub status_after: Option<RecordStatus>,
    /// The record as this transaction last saw it
    pub record: Option<MemberRecord>,
}
