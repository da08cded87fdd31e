//! Model to entity mappers
//!
//! Conversions from database rows (models) to domain entities. Status and
//! kind columns are constrained by CHECK clauses, so a parse failure here
//! means the schema and the code disagree; it surfaces as a database error
//! rather than being papered over with a default.

mod dead_letter;
mod event_log;
mod queue;
mod record;
mod report;

use hackster_core::error::DomainError;

/// Error for a column value the domain layer cannot represent
pub(crate) fn corrupt_column(column: &str, value: &str) -> DomainError {
    DomainError::DatabaseError(format!("corrupt {column} value: {value:?}"))
}
