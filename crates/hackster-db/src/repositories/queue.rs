//! PostgreSQL implementation of EventQueueRepository
//!
//! The queue holds every inbound event from ingest until its terminal
//! outcome. Claiming uses FOR UPDATE SKIP LOCKED so workers never block each
//! other, and the older-sibling guard keeps per-source delivery strictly
//! ordered even while an earlier event for the same source waits out a
//! backoff delay.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Duration;
use tracing::{instrument, warn};

use hackster_core::entities::{EventOrigin, EventOutcome, NewLogEntry, QueuedEvent};
use hackster_core::error::DomainError;
use hackster_core::events::ChatEvent;
use hackster_core::traits::{EventQueueRepository, RepoResult};

use crate::models::EventQueueModel;

use super::error::map_db_error;
use super::event_log::insert_log_entry;

/// PostgreSQL implementation of EventQueueRepository
#[derive(Clone)]
pub struct PgEventQueueRepository {
    pool: PgPool,
}

impl PgEventQueueRepository {
    /// Create a new PgEventQueueRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Audit entry for a terminal failure. Status columns stay empty: a failed
/// event committed no state observation.
fn failed_entry(event: &QueuedEvent, error: &str) -> NewLogEntry {
    NewLogEntry {
        event_kind: event.event_kind,
        source_id: event.source_id,
        dedup_token: event.dedup_token.clone(),
        outcome: EventOutcome::Failed,
        status_before: None,
        status_after: None,
        detail: Some(error.to_string()),
        origin: event.origin,
    }
}

#[async_trait]
impl EventQueueRepository for PgEventQueueRepository {
    #[instrument(skip(self, event), fields(kind = %event.kind, source_id = %event.source_id))]
    async fn enqueue(&self, event: &ChatEvent, origin: EventOrigin) -> RepoResult<QueuedEvent> {
        let row = sqlx::query_as::<_, EventQueueModel>(
            r"
            INSERT INTO event_queue
                (event_kind, source_id, dedup_token, payload, received_at, origin)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, event_kind, source_id, dedup_token, payload, received_at,
                      state, attempts, run_at, claimed_at, last_error, origin, created_at
            ",
        )
        .bind(event.kind.as_str())
        .bind(event.source_id.into_inner())
        .bind(&event.dedup_token)
        .bind(&event.payload)
        .bind(event.received_at)
        .bind(origin.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        QueuedEvent::try_from(row)
    }

    #[instrument(skip(self))]
    async fn claim(&self) -> RepoResult<Option<QueuedEvent>> {
        // Eligibility: due, pending, and no older queue row for the same
        // source in any state. A processing or delayed older sibling blocks
        // its successors, which is what per-source FIFO means here.
        let row = sqlx::query_as::<_, EventQueueModel>(
            r"
            WITH next AS (
                SELECT q.id
                FROM event_queue q
                WHERE q.state = 'pending'
                  AND q.run_at <= now()
                  AND NOT EXISTS (
                      SELECT 1 FROM event_queue older
                      WHERE older.source_id = q.source_id AND older.id < q.id
                  )
                ORDER BY q.id
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            UPDATE event_queue
            SET state = 'processing', claimed_at = now()
            FROM next
            WHERE event_queue.id = next.id
            RETURNING event_queue.id, event_queue.event_kind, event_queue.source_id,
                      event_queue.dedup_token, event_queue.payload, event_queue.received_at,
                      event_queue.state, event_queue.attempts, event_queue.run_at,
                      event_queue.claimed_at, event_queue.last_error, event_queue.origin,
                      event_queue.created_at
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(QueuedEvent::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn ack(&self, queue_id: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM event_queue WHERE id = $1
            ",
        )
        .bind(queue_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            // Most likely a stale-claim sweep raced us. The transition
            // already committed, so nothing is lost.
            warn!(queue_id, "acked queue row was already gone");
        }

        Ok(())
    }

    #[instrument(skip(self, error))]
    async fn release(
        &self,
        queue_id: i64,
        next_run_at: DateTime<Utc>,
        error: &str,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE event_queue
            SET state = 'pending', run_at = $2, attempts = attempts + 1,
                last_error = $3, claimed_at = NULL
            WHERE id = $1
            ",
        )
        .bind(queue_id)
        .bind(next_run_at)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, event, error), fields(queue_id = event.id, source_id = %event.source_id))]
    async fn bury(&self, event: &QueuedEvent, error: &str) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO dead_letters
                (event_kind, source_id, dedup_token, payload, received_at, attempts, last_error)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(event.event_kind.as_str())
        .bind(event.source_id.into_inner())
        .bind(&event.dedup_token)
        .bind(&event.payload)
        .bind(event.received_at)
        .bind(event.attempts + 1)
        .bind(error)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        insert_log_entry(&mut tx, &failed_entry(event, error))
            .await
            .map_err(map_db_error)?;

        sqlx::query(
            r"
            DELETE FROM event_queue WHERE id = $1
            ",
        )
        .bind(event.id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, event, error), fields(queue_id = event.id, source_id = %event.source_id))]
    async fn reject(&self, event: &QueuedEvent, error: &str) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        insert_log_entry(&mut tx, &failed_entry(event, error))
            .await
            .map_err(map_db_error)?;

        sqlx::query(
            r"
            DELETE FROM event_queue WHERE id = $1
            ",
        )
        .bind(event.id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn requeue_stale(&self, older_than: Duration) -> RepoResult<u64> {
        let horizon = chrono::Duration::from_std(older_than)
            .map_err(|e| DomainError::InternalError(format!("stale horizon out of range: {e}")))?;
        let cutoff = Utc::now() - horizon;

        let result = sqlx::query(
            r"
            UPDATE event_queue
            SET state = 'pending', claimed_at = NULL, origin = 'recovery'
            WHERE state = 'processing' AND claimed_at < $1
            ",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn depth(&self) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM event_queue
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hackster_core::entities::QueueState;
    use hackster_core::events::EventKind;
    use hackster_core::value_objects::Snowflake;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgEventQueueRepository>();
    }

    #[test]
    fn test_failed_entry_keeps_origin_and_error() {
        let row = QueuedEvent {
            id: 3,
            event_kind: EventKind::Retire,
            source_id: Snowflake::new(88),
            dedup_token: "leave:1:88".to_string(),
            payload: serde_json::json!({}),
            received_at: Utc::now(),
            state: QueueState::Processing,
            attempts: 4,
            run_at: Utc::now(),
            claimed_at: Some(Utc::now()),
            last_error: Some("timeout".to_string()),
            origin: EventOrigin::Api,
            created_at: Utc::now(),
        };

        let entry = failed_entry(&row, "still timing out");
        assert_eq!(entry.outcome, EventOutcome::Failed);
        assert_eq!(entry.origin, EventOrigin::Api);
        assert_eq!(entry.detail.as_deref(), Some("still timing out"));
        assert_eq!(entry.status_before, None);
        assert_eq!(entry.status_after, None);
    }
}
