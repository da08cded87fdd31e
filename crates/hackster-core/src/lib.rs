//! # hackster-core
//!
//! Domain layer containing entities, value objects, the record state machine,
//! repository traits, and domain errors.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod sanitize;
pub mod traits;
pub mod transitions;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    DeadLetter, EventLogEntry, EventOrigin, EventOutcome, MemberRecord, NewLogEntry, NewReport,
    QueueState, QueuedEvent, RecordStatus, Report,
};
pub use error::DomainError;
pub use events::{ChatEvent, EventKind};
pub use traits::{
    DeadLetterRepository, EventLogRepository, EventQueueRepository, RecordFilter,
    RecordRepository, RepoResult, ReportRepository, TransitionStore,
};
pub use transitions::{
    kind_for_override, step, Step, TransitionCommand, TransitionOutcome, TransitionReceipt,
};
pub use value_objects::{Snowflake, SnowflakeParseError};
