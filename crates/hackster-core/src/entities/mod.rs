//! Domain entities - core business objects

mod dead_letter;
mod event_log;
mod queue;
mod record;
mod report;

pub use dead_letter::DeadLetter;
pub use event_log::{EventLogEntry, EventOrigin, EventOutcome, NewLogEntry};
pub use queue::{QueueState, QueuedEvent};
pub use record::{MemberRecord, RecordStatus};
pub use report::{NewReport, Report, MAX_REPORT_LENGTH};
