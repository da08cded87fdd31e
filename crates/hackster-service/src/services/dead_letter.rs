//! Dead letter service
//!
//! Read-only window over terminally failed events. Rows land here through
//! the queue's bury path; inspection and cleanup stay manual.

use tracing::instrument;

use crate::dto::{DeadLetterResponse, ListResponse};

use super::check_limit;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Dead letter service
pub struct DeadLetterService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DeadLetterService<'a> {
    /// Create a new DeadLetterService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List dead letters, newest first
    #[instrument(skip(self))]
    pub async fn list(&self, limit: i64) -> ServiceResult<ListResponse<DeadLetterResponse>> {
        check_limit(limit)?;

        let letters = self.ctx.dead_letter_repo().list(limit).await?;

        Ok(ListResponse::new(
            letters.into_iter().map(DeadLetterResponse::from).collect(),
            limit,
            0,
        ))
    }
}
