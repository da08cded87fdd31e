//! Report database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the reports table
#[derive(Debug, Clone, FromRow)]
pub struct ReportModel {
    pub id: i64,
    pub reporter_id: i64,
    pub subject_id: Option<i64>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
