//! Transition service
//!
//! Routes event occurrences and manual overrides through the record state
//! machine. Every write in the system funnels through `apply`, so the
//! exactly-once and ordering guarantees live behind this one seam.

use hackster_core::entities::{EventOrigin, RecordStatus};
use hackster_core::events::ChatEvent;
use hackster_core::transitions::{kind_for_override, TransitionCommand};
use hackster_core::Snowflake;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::dto::TransitionResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Transition service
pub struct TransitionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TransitionService<'a> {
    /// Create a new TransitionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply one event occurrence to its record
    ///
    /// Replays of an already-applied occurrence come back as
    /// `skipped_duplicate`; events with no edge from the current state come
    /// back as `skipped_noop`. Neither is an error.
    #[instrument(skip(self, event), fields(kind = %event.kind, source_id = %event.source_id))]
    pub async fn apply_event(
        &self,
        event: &ChatEvent,
        origin: EventOrigin,
    ) -> ServiceResult<TransitionResponse> {
        if event.source_id.is_zero() {
            return Err(ServiceError::validation("source_id must not be zero"));
        }
        if event.dedup_token.trim().is_empty() {
            return Err(ServiceError::validation("dedup_token must not be empty"));
        }

        let cmd = TransitionCommand {
            kind: event.kind,
            source_id: event.source_id,
            dedup_token: event.dedup_token.clone(),
            username: event.username().map(str::to_string),
            origin,
            detail: None,
        };

        self.apply_with_retry(&cmd).await
    }

    /// Manually force a record toward a target status
    ///
    /// The override is expressed as the canonical event kind for that edge and
    /// runs through the same apply path as gateway traffic, so it shows up in
    /// the audit log like any other event.
    #[instrument(skip(self))]
    pub async fn override_status(
        &self,
        id: Snowflake,
        target: RecordStatus,
        reason: Option<String>,
    ) -> ServiceResult<TransitionResponse> {
        let current = self
            .ctx
            .record_repo()
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Record", id.to_string()))?;

        let Some(kind) = kind_for_override(current.status, target) else {
            return Err(ServiceError::validation(
                "no transition reaches status 'new'",
            ));
        };

        let cmd = TransitionCommand {
            kind,
            source_id: id,
            // Overrides are one-shot commands, never redelivered, so a fresh
            // token is correct
            dedup_token: Uuid::new_v4().to_string(),
            username: None,
            origin: EventOrigin::Api,
            detail: reason.clone(),
        };

        let response = self.apply_with_retry(&cmd).await?;

        info!(
            record_id = %id,
            target = %target,
            outcome = %response.outcome.as_str(),
            "Status overridden"
        );
        self.ctx.notifier().ops(format!(
            "status override: record {id} -> {target} ({}){}",
            response.outcome.as_str(),
            reason.map(|r| format!(", reason: {r}")).unwrap_or_default()
        ));

        Ok(response)
    }

    /// Run the command, retrying exactly once when a concurrent writer got
    /// there first
    async fn apply_with_retry(&self, cmd: &TransitionCommand) -> ServiceResult<TransitionResponse> {
        match self.ctx.transition_store().apply(cmd).await {
            Err(e) if e.is_conflict() => {
                debug!(
                    source_id = %cmd.source_id,
                    dedup_token = %cmd.dedup_token,
                    "Transition lost a write race, retrying with fresh state"
                );
                let receipt = self.ctx.transition_store().apply(cmd).await?;
                Ok(TransitionResponse::from(receipt))
            }
            Err(e) => Err(ServiceError::from(e)),
            Ok(receipt) => Ok(TransitionResponse::from(receipt)),
        }
    }
}
