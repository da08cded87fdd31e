//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod context;
pub mod dead_letter;
pub mod error;
pub mod record;
pub mod report;
pub mod transition;

#[cfg(test)]
mod doubles;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use dead_letter::DeadLetterService;
pub use error::{ServiceError, ServiceResult};
pub use record::RecordService;
pub use report::ReportService;
pub use transition::TransitionService;

/// Largest page any bounded listing accepts
pub const MAX_PAGE_SIZE: i64 = 500;

/// Reject out-of-range paging bounds before they reach a repository
pub(crate) fn check_bounds(limit: i64, offset: i64) -> ServiceResult<()> {
    check_limit(limit)?;
    if offset < 0 {
        return Err(ServiceError::validation("offset must not be negative"));
    }
    Ok(())
}

pub(crate) fn check_limit(limit: i64) -> ServiceResult<()> {
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(ServiceError::validation(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    Ok(())
}
