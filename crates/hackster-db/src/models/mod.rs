//! Database models - SQLx-compatible structs for PostgreSQL tables

mod dead_letter;
mod event_log;
mod queue;
mod record;
mod report;

pub use dead_letter::DeadLetterModel;
pub use event_log::EventLogModel;
pub use queue::EventQueueModel;
pub use record::MemberRecordModel;
pub use report::ReportModel;
