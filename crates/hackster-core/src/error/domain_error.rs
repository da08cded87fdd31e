//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Record not found: {0}")]
    RecordNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid record status: {0}")]
    InvalidStatus(String),

    #[error("Invalid event kind: {0}")]
    InvalidEventKind(String),

    #[error("Report body is empty")]
    EmptyReportBody,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Record version is stale: {0}")]
    StaleRecord(Snowflake),

    #[error("Duplicate event occurrence: {0}")]
    DuplicateEvent(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::RecordNotFound(_) => "UNKNOWN_RECORD",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::InvalidEventKind(_) => "INVALID_EVENT_KIND",
            Self::EmptyReportBody => "EMPTY_REPORT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            // Conflict
            Self::StaleRecord(_) => "STALE_RECORD",
            Self::DuplicateEvent(_) => "DUPLICATE_EVENT",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidStatus(_)
                | Self::InvalidEventKind(_)
                | Self::EmptyReportBody
                | Self::ContentTooLong { .. }
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::StaleRecord(_) | Self::DuplicateEvent(_))
    }

    /// Check if a retry with backoff could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::InternalError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::RecordNotFound(Snowflake::new(1));
        assert_eq!(err.code(), "UNKNOWN_RECORD");

        let err = DomainError::InvalidStatus("banned".to_string());
        assert_eq!(err.code(), "INVALID_STATUS");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::RecordNotFound(Snowflake::new(1)).is_not_found());
        assert!(!DomainError::EmptyReportBody.is_not_found());
    }

    #[test]
    fn test_is_validation() {
        assert!(DomainError::InvalidEventKind("presence".to_string()).is_validation());
        assert!(DomainError::ContentTooLong { max: 2000 }.is_validation());
        assert!(!DomainError::StaleRecord(Snowflake::new(1)).is_validation());
    }

    #[test]
    fn test_transient_classification() {
        assert!(DomainError::DatabaseError("pool timed out".to_string()).is_transient());
        assert!(!DomainError::ValidationError("bad payload".to_string()).is_transient());
        assert!(!DomainError::StaleRecord(Snowflake::new(1)).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::RecordNotFound(Snowflake::new(123));
        assert_eq!(err.to_string(), "Record not found: 123");

        let err = DomainError::ContentTooLong { max: 2000 };
        assert_eq!(err.to_string(), "Content too long: max 2000 characters");
    }
}
