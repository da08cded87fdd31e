//! PostgreSQL implementation of ReportRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hackster_core::entities::{NewReport, Report};
use hackster_core::traits::{ReportRepository, RepoResult};
use hackster_core::value_objects::Snowflake;

use crate::models::ReportModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ReportRepository
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    /// Create a new PgReportRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    #[instrument(skip(self, report), fields(reporter_id = %report.reporter_id))]
    async fn create(&self, report: &NewReport) -> RepoResult<Report> {
        let row = sqlx::query_as::<_, ReportModel>(
            r"
            INSERT INTO reports (reporter_id, subject_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, reporter_id, subject_id, body, created_at
            ",
        )
        .bind(report.reporter_id.into_inner())
        .bind(report.subject_id.map(Snowflake::into_inner))
        .bind(&report.body)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Report::from(row))
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64) -> RepoResult<Vec<Report>> {
        let results = sqlx::query_as::<_, ReportModel>(
            r"
            SELECT id, reporter_id, subject_id, body, created_at
            FROM reports
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Report::from).collect())
    }
}
