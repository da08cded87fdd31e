//! PostgreSQL implementation of DeadLetterRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hackster_core::entities::DeadLetter;
use hackster_core::traits::{DeadLetterRepository, RepoResult};

use crate::models::DeadLetterModel;

use super::error::map_db_error;

/// PostgreSQL implementation of DeadLetterRepository
#[derive(Clone)]
pub struct PgDeadLetterRepository {
    pool: PgPool,
}

impl PgDeadLetterRepository {
    /// Create a new PgDeadLetterRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeadLetterRepository for PgDeadLetterRepository {
    #[instrument(skip(self))]
    async fn list(&self, limit: i64) -> RepoResult<Vec<DeadLetter>> {
        let results = sqlx::query_as::<_, DeadLetterModel>(
            r"
            SELECT id, event_kind, source_id, dedup_token, payload,
                   received_at, attempts, last_error, created_at
            FROM dead_letters
            ORDER BY id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(DeadLetter::try_from).collect()
    }
}
