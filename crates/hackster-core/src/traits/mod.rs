//! Repository traits (ports)

mod repositories;

pub use repositories::{
    DeadLetterRepository, EventLogRepository, EventQueueRepository, RecordFilter,
    RecordRepository, RepoResult, ReportRepository, TransitionStore,
};
