//! PostgreSQL implementation of EventLogRepository
//!
//! Reads only. Log inserts are crate-internal and always run inside a
//! caller-owned transaction, so an audit row can never outlive a rolled-back
//! state change.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use hackster_core::entities::{EventLogEntry, NewLogEntry, RecordStatus};
use hackster_core::traits::{EventLogRepository, RepoResult};
use hackster_core::value_objects::Snowflake;

use crate::models::EventLogModel;

use super::error::map_db_error;

/// Insert one audit row inside the caller's transaction.
///
/// Returns the raw sqlx error so callers can distinguish a unique violation
/// on the applied-once index from other failures.
pub(crate) async fn insert_log_entry(
    tx: &mut Transaction<'_, Postgres>,
    entry: &NewLogEntry,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO event_log
            (event_kind, source_id, dedup_token, outcome, status_before, status_after, detail, origin)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ",
    )
    .bind(entry.event_kind.as_str())
    .bind(entry.source_id.into_inner())
    .bind(&entry.dedup_token)
    .bind(entry.outcome.as_str())
    .bind(entry.status_before.map(RecordStatus::as_str))
    .bind(entry.status_after.map(RecordStatus::as_str))
    .bind(entry.detail.as_deref())
    .bind(entry.origin.as_str())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// PostgreSQL implementation of EventLogRepository
#[derive(Clone)]
pub struct PgEventLogRepository {
    pool: PgPool,
}

impl PgEventLogRepository {
    /// Create a new PgEventLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventLogRepository for PgEventLogRepository {
    #[instrument(skip(self))]
    async fn list_for_source(
        &self,
        source_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<EventLogEntry>> {
        let results = sqlx::query_as::<_, EventLogModel>(
            r"
            SELECT id, event_kind, source_id, dedup_token, outcome,
                   status_before, status_after, detail, origin, created_at
            FROM event_log
            WHERE source_id = $1
            ORDER BY id DESC
            LIMIT $2
            ",
        )
        .bind(source_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(EventLogEntry::try_from).collect()
    }
}
