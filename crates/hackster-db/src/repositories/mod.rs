//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in
//! hackster-core. Each repository handles database operations for a specific
//! table; the transition store owns the one multi-table transaction on the
//! event processing path.

mod dead_letter;
mod error;
mod event_log;
mod queue;
mod record;
mod report;
mod transition;

pub use dead_letter::PgDeadLetterRepository;
pub use event_log::PgEventLogRepository;
pub use queue::PgEventQueueRepository;
pub use record::PgRecordRepository;
pub use report::PgReportRepository;
pub use transition::PgTransitionStore;
