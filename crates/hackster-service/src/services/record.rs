//! Record service
//!
//! Read-side queries over member records and their audit trails. All writes
//! go through the transition service; nothing here mutates.

use hackster_core::entities::RecordStatus;
use hackster_core::traits::RecordFilter;
use hackster_core::Snowflake;
use tracing::instrument;

use crate::dto::{EventEntryResponse, ListResponse, RecordResponse, RecordStatsResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::{check_bounds, check_limit};

/// Record service
pub struct RecordService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RecordService<'a> {
    /// Create a new RecordService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get one record by platform id
    #[instrument(skip(self))]
    pub async fn get(&self, id: Snowflake) -> ServiceResult<RecordResponse> {
        let record = self
            .ctx
            .record_repo()
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Record", id.to_string()))?;

        Ok(RecordResponse::from(record))
    }

    /// List records matching the filter, newest first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<RecordStatus>,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<ListResponse<RecordResponse>> {
        check_bounds(limit, offset)?;

        let records = self
            .ctx
            .record_repo()
            .list(RecordFilter {
                status,
                limit,
                offset,
            })
            .await?;

        Ok(ListResponse::new(
            records.into_iter().map(RecordResponse::from).collect(),
            limit,
            offset,
        ))
    }

    /// Audit trail for one record, newest first
    ///
    /// Deliberately no existence check: a source can have failed log entries
    /// without a record ever being created, and those rows are exactly what
    /// an operator comes here to see.
    #[instrument(skip(self))]
    pub async fn events(
        &self,
        id: Snowflake,
        limit: i64,
    ) -> ServiceResult<ListResponse<EventEntryResponse>> {
        check_limit(limit)?;

        let entries = self.ctx.event_log_repo().list_for_source(id, limit).await?;

        Ok(ListResponse::new(
            entries.into_iter().map(EventEntryResponse::from).collect(),
            limit,
            0,
        ))
    }

    /// Total and per-status record counts
    #[instrument(skip(self))]
    pub async fn stats(&self) -> ServiceResult<RecordStatsResponse> {
        let repo = self.ctx.record_repo();

        let total = repo.count(None).await?;
        let new = repo.count(Some(RecordStatus::New)).await?;
        let active = repo.count(Some(RecordStatus::Active)).await?;
        let flagged = repo.count(Some(RecordStatus::Flagged)).await?;
        let retired = repo.count(Some(RecordStatus::Retired)).await?;

        Ok(RecordStatsResponse {
            total,
            new,
            active,
            flagged,
            retired,
        })
    }
}
