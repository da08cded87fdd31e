//! Transactional transition store
//!
//! One transaction per event occurrence: duplicate check, record load, state
//! machine evaluation, guarded record write, one audit row. Everything
//! commits together or not at all, so the log can never disagree with the
//! records table.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use hackster_core::entities::{EventOutcome, MemberRecord, NewLogEntry, RecordStatus};
use hackster_core::error::DomainError;
use hackster_core::traits::{RepoResult, TransitionStore};
use hackster_core::transitions::{
    step, Step, TransitionCommand, TransitionOutcome, TransitionReceipt,
};

use crate::models::MemberRecordModel;

use super::error::{map_db_error, map_unique_violation};
use super::event_log::insert_log_entry;

/// PostgreSQL implementation of TransitionStore
#[derive(Clone)]
pub struct PgTransitionStore {
    pool: PgPool,
}

impl PgTransitionStore {
    /// Create a new PgTransitionStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const fn log_outcome(outcome: TransitionOutcome) -> EventOutcome {
    match outcome {
        TransitionOutcome::Applied => EventOutcome::Applied,
        TransitionOutcome::SkippedDuplicate => EventOutcome::SkippedDuplicate,
        TransitionOutcome::SkippedNoop => EventOutcome::SkippedNoop,
    }
}

#[async_trait]
impl TransitionStore for PgTransitionStore {
    #[instrument(skip(self, cmd), fields(kind = %cmd.kind, source_id = %cmd.source_id))]
    async fn apply(&self, cmd: &TransitionCommand) -> RepoResult<TransitionReceipt> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let already_applied = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM event_log
                WHERE event_kind = $1 AND source_id = $2 AND dedup_token = $3
                  AND outcome = 'applied'
            )
            ",
        )
        .bind(cmd.kind.as_str())
        .bind(cmd.source_id.into_inner())
        .bind(&cmd.dedup_token)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let current = sqlx::query_as::<_, MemberRecordModel>(
            r"
            SELECT id, username, status, version, created_at, updated_at
            FROM member_records
            WHERE id = $1
            ",
        )
        .bind(cmd.source_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;
        let current: Option<MemberRecord> = current.map(MemberRecord::try_from).transpose()?;

        if already_applied {
            // Redelivery of an occurrence that already took effect. Record
            // the sighting and change nothing.
            let status = current.as_ref().map(|r| r.status);
            let receipt = TransitionReceipt {
                outcome: TransitionOutcome::SkippedDuplicate,
                status_before: status,
                status_after: status,
                record: current,
            };
            finish(tx, cmd, &receipt).await?;
            return Ok(receipt);
        }

        let receipt = match step(current.as_ref().map(|r| r.status), cmd.kind) {
            Step::Create { status } => {
                let record = insert_record(&mut tx, cmd, status).await?;
                TransitionReceipt {
                    outcome: TransitionOutcome::Applied,
                    status_before: None,
                    status_after: Some(status),
                    record: Some(record),
                }
            }
            Step::CreateNoop => {
                // First observation by a kind with no edge from new. The row
                // is still created so the member is tracked from here on,
                // but the event itself lands as a no-op.
                let record = insert_record(&mut tx, cmd, RecordStatus::New).await?;
                TransitionReceipt {
                    outcome: TransitionOutcome::SkippedNoop,
                    status_before: None,
                    status_after: Some(RecordStatus::New),
                    record: Some(record),
                }
            }
            Step::Apply { from, to } => {
                // step() only yields Apply for an existing record, so the
                // version read above is always present; a zero guard would
                // simply never match.
                let version = current.as_ref().map_or(0, |r| r.version);
                let record = update_record(&mut tx, cmd, to, version).await?;
                TransitionReceipt {
                    outcome: TransitionOutcome::Applied,
                    status_before: Some(from),
                    status_after: Some(to),
                    record: Some(record),
                }
            }
            Step::Noop { current: status } => TransitionReceipt {
                outcome: TransitionOutcome::SkippedNoop,
                status_before: Some(status),
                status_after: Some(status),
                record: current,
            },
        };

        finish(tx, cmd, &receipt).await?;

        Ok(receipt)
    }
}

/// Insert a fresh record row.
///
/// A primary-key violation means another transaction created this record
/// after our load; surface it as a stale conflict so the caller re-runs
/// against fresh state.
async fn insert_record(
    tx: &mut Transaction<'_, Postgres>,
    cmd: &TransitionCommand,
    status: RecordStatus,
) -> RepoResult<MemberRecord> {
    let row = sqlx::query_as::<_, MemberRecordModel>(
        r"
        INSERT INTO member_records (id, username, status)
        VALUES ($1, $2, $3)
        RETURNING id, username, status, version, created_at, updated_at
        ",
    )
    .bind(cmd.source_id.into_inner())
    .bind(cmd.username.as_deref())
    .bind(status.as_str())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| map_unique_violation(e, || DomainError::StaleRecord(cmd.source_id)))?;

    MemberRecord::try_from(row)
}

/// Move an existing record along an edge, guarded by the version read in
/// this transaction. Zero rows updated means a concurrent writer got there
/// first.
async fn update_record(
    tx: &mut Transaction<'_, Postgres>,
    cmd: &TransitionCommand,
    to: RecordStatus,
    version: i64,
) -> RepoResult<MemberRecord> {
    let row = sqlx::query_as::<_, MemberRecordModel>(
        r"
        UPDATE member_records
        SET status = $2, username = COALESCE($3, username),
            version = version + 1, updated_at = now()
        WHERE id = $1 AND version = $4
        RETURNING id, username, status, version, created_at, updated_at
        ",
    )
    .bind(cmd.source_id.into_inner())
    .bind(to.as_str())
    .bind(cmd.username.as_deref())
    .bind(version)
    .fetch_optional(&mut **tx)
    .await
    .map_err(map_db_error)?;

    let Some(row) = row else {
        return Err(DomainError::StaleRecord(cmd.source_id));
    };

    MemberRecord::try_from(row)
}

/// Append the audit row and commit.
///
/// A unique violation on the applied-once index means another transaction
/// applied this same occurrence after our duplicate check; it surfaces as a
/// duplicate conflict and rolls everything back, so the caller's retry sees
/// a clean duplicate skip.
async fn finish(
    mut tx: Transaction<'_, Postgres>,
    cmd: &TransitionCommand,
    receipt: &TransitionReceipt,
) -> RepoResult<()> {
    let entry = NewLogEntry {
        event_kind: cmd.kind,
        source_id: cmd.source_id,
        dedup_token: cmd.dedup_token.clone(),
        outcome: log_outcome(receipt.outcome),
        status_before: receipt.status_before,
        status_after: receipt.status_after,
        detail: cmd.detail.clone(),
        origin: cmd.origin,
    };

    insert_log_entry(&mut tx, &entry).await.map_err(|e| {
        map_unique_violation(e, || DomainError::DuplicateEvent(cmd.dedup_token.clone()))
    })?;

    tx.commit().await.map_err(map_db_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgTransitionStore>();
    }

    #[test]
    fn test_log_outcome_mapping() {
        assert_eq!(log_outcome(TransitionOutcome::Applied), EventOutcome::Applied);
        assert_eq!(
            log_outcome(TransitionOutcome::SkippedDuplicate),
            EventOutcome::SkippedDuplicate
        );
        assert_eq!(
            log_outcome(TransitionOutcome::SkippedNoop),
            EventOutcome::SkippedNoop
        );
    }
}
