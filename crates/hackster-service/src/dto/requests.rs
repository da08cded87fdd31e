//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Record Requests
// ============================================================================

/// Manual status override request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OverrideStatusRequest {
    /// Target status: `active`, `flagged`, or `retired` (`new` is not
    /// reachable by hand)
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,

    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

// ============================================================================
// Report Requests
// ============================================================================

/// Member report submission
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReportRequest {
    /// Reporting member (Snowflake ID as string)
    #[validate(length(min = 1, message = "Reporter id is required"))]
    pub reporter_id: String,

    /// Reported member, if the report names one (Snowflake ID as string)
    pub subject_id: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Report body must be 1-2000 characters"))]
    pub body: String,
}
