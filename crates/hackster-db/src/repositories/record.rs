//! PostgreSQL implementation of RecordRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hackster_core::entities::{MemberRecord, RecordStatus};
use hackster_core::traits::{RecordFilter, RecordRepository, RepoResult};
use hackster_core::value_objects::Snowflake;

use crate::models::MemberRecordModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RecordRepository
#[derive(Clone)]
pub struct PgRecordRepository {
    pool: PgPool,
}

impl PgRecordRepository {
    /// Create a new PgRecordRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository for PgRecordRepository {
    #[instrument(skip(self))]
    async fn find(&self, id: Snowflake) -> RepoResult<Option<MemberRecord>> {
        let result = sqlx::query_as::<_, MemberRecordModel>(
            r"
            SELECT id, username, status, version, created_at, updated_at
            FROM member_records
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(MemberRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: RecordFilter) -> RepoResult<Vec<MemberRecord>> {
        let results = sqlx::query_as::<_, MemberRecordModel>(
            r"
            SELECT id, username, status, version, created_at, updated_at
            FROM member_records
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(filter.status.map(RecordStatus::as_str))
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(MemberRecord::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count(&self, status: Option<RecordStatus>) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM member_records
            WHERE ($1::text IS NULL OR status = $1)
            ",
        )
        .bind(status.map(RecordStatus::as_str))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
