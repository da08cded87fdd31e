//! Queue workers - claim, apply, settle
//!
//! Each worker drains the queue one claimed row at a time. The transition
//! itself (state step, audit row, dedup) commits inside
//! `TransitionService::apply_event`; the worker only decides what happens to
//! the queue row afterwards. Per-source ordering is the claim query's
//! responsibility, so workers never coordinate with each other.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rand::Rng;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use hackster_common::config::BridgeConfig;
use hackster_common::telemetry::{
    register_dead_letter, register_event_processed, register_event_retry,
};
use hackster_core::entities::QueuedEvent;
use hackster_core::traits::EventQueueRepository;
use hackster_core::transitions::TransitionOutcome;
use hackster_service::dto::TransitionResponse;
use hackster_service::{ServiceContext, ServiceError, TransitionService};

/// One queue worker
pub struct Worker {
    id: usize,
    queue: Arc<dyn EventQueueRepository>,
    services: Arc<ServiceContext>,
    config: BridgeConfig,
    shutdown: watch::Receiver<bool>,
}

impl Worker {
    pub fn new(
        id: usize,
        queue: Arc<dyn EventQueueRepository>,
        services: Arc<ServiceContext>,
        config: BridgeConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            id,
            queue,
            services,
            config,
            shutdown,
        }
    }

    /// Claim-process loop; returns after the shutdown flag flips, once any
    /// in-flight event is settled
    pub async fn run(mut self) {
        info!(worker = self.id, "Worker started");

        loop {
            if self.should_stop() {
                break;
            }

            match self.queue.claim().await {
                Ok(Some(row)) => self.process(row).await,
                Ok(None) => self.idle().await,
                Err(e) => {
                    warn!(worker = self.id, error = %e, "Claim failed");
                    self.idle().await;
                }
            }
        }

        info!(worker = self.id, "Worker stopped");
    }

    fn should_stop(&self) -> bool {
        // A dropped sender counts as shutdown
        self.shutdown.has_changed().is_err() || *self.shutdown.borrow()
    }

    async fn idle(&mut self) {
        tokio::select! {
            () = tokio::time::sleep(self.config.poll_interval()) => {}
            _ = self.shutdown.changed() => {}
        }
    }

    async fn process(&self, row: QueuedEvent) {
        let started = Instant::now();
        let event = row.to_event();
        let service = TransitionService::new(&self.services);

        let attempt = match timeout(
            self.config.attempt_timeout(),
            service.apply_event(&event, row.origin),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(ServiceError::internal(format!(
                "attempt timed out after {}s",
                self.config.attempt_timeout_secs
            ))),
        };

        match classify(&attempt, row.attempts, self.config.max_attempts) {
            Disposition::Ack { outcome } => {
                if let Err(e) = self.queue.ack(row.id).await {
                    // The transition committed; a stale-sweep replay will
                    // settle as skipped_duplicate
                    warn!(worker = self.id, queue_id = row.id, error = %e, "Ack failed");
                    return;
                }
                register_event_processed(row.event_kind.as_str(), outcome.as_str(), started.elapsed());
                debug!(
                    worker = self.id,
                    queue_id = row.id,
                    kind = %row.event_kind,
                    source_id = %row.source_id,
                    outcome = %outcome.as_str(),
                    "Event applied"
                );
            }
            Disposition::Reject { reason } => {
                if let Err(e) = self.queue.reject(&row, &reason).await {
                    warn!(worker = self.id, queue_id = row.id, error = %e, "Reject failed");
                    return;
                }
                register_event_processed(row.event_kind.as_str(), "rejected", started.elapsed());
                warn!(
                    worker = self.id,
                    queue_id = row.id,
                    kind = %row.event_kind,
                    source_id = %row.source_id,
                    error = %reason,
                    "Event rejected"
                );
                self.services.notifier().ops(format!(
                    "event rejected: {} from {}: {reason}",
                    row.event_kind, row.source_id
                ));
            }
            Disposition::Bury { reason } => {
                if let Err(e) = self.queue.bury(&row, &reason).await {
                    error!(worker = self.id, queue_id = row.id, error = %e, "Bury failed");
                    return;
                }
                register_event_processed(row.event_kind.as_str(), "buried", started.elapsed());
                register_dead_letter(row.event_kind.as_str());
                error!(
                    worker = self.id,
                    queue_id = row.id,
                    kind = %row.event_kind,
                    source_id = %row.source_id,
                    attempts = row.attempts + 1,
                    error = %reason,
                    "Event dead-lettered"
                );
                self.services.notifier().ops(format!(
                    "event dead-lettered after {} attempts: {} from {}",
                    row.attempts + 1,
                    row.event_kind,
                    row.source_id
                ));
                self.services.notifier().error(format!(
                    "event dead-lettered: {} from {} after {} attempts: {reason}",
                    row.event_kind,
                    row.source_id,
                    row.attempts + 1
                ));
            }
            Disposition::Release { reason } => {
                let delay_ms = backoff_delay_ms(
                    row.attempts,
                    self.config.base_backoff_ms,
                    self.config.max_backoff_ms,
                );
                let next_run_at = Utc::now() + chrono::Duration::milliseconds(delay_ms as i64);
                if let Err(e) = self.queue.release(row.id, next_run_at, &reason).await {
                    warn!(worker = self.id, queue_id = row.id, error = %e, "Release failed");
                    return;
                }
                register_event_retry(row.event_kind.as_str());
                warn!(
                    worker = self.id,
                    queue_id = row.id,
                    kind = %row.event_kind,
                    attempt = row.attempts + 1,
                    delay_ms,
                    error = %reason,
                    "Event released for retry"
                );
            }
        }
    }
}

/// What to do with a claimed row after one processing attempt
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// Terminal success; the apply transaction already wrote the audit row
    Ack { outcome: TransitionOutcome },
    /// Permanent failure; replaying the same payload cannot succeed
    Reject { reason: String },
    /// Retry budget exhausted
    Bury { reason: String },
    /// Transient failure; reschedule with backoff
    Release { reason: String },
}

/// Settle one attempt. `prior_failures` is the row's failure count before
/// this attempt.
pub(crate) fn classify(
    attempt: &Result<TransitionResponse, ServiceError>,
    prior_failures: i32,
    max_attempts: i32,
) -> Disposition {
    match attempt {
        Ok(response) => Disposition::Ack {
            outcome: response.outcome,
        },
        Err(e) if e.status_code() == 400 => Disposition::Reject {
            reason: e.to_string(),
        },
        Err(e) if prior_failures + 1 >= max_attempts => Disposition::Bury {
            reason: e.to_string(),
        },
        Err(e) => Disposition::Release {
            reason: e.to_string(),
        },
    }
}

/// Exponential backoff in milliseconds: `base * 2^failures`, capped at
/// `max_ms`, plus up to 25% jitter so synchronized failures spread out
pub(crate) fn backoff_delay_ms(prior_failures: i32, base_ms: u64, max_ms: u64) -> u64 {
    // Clamp the shift so the multiply stays in range
    let exp = u32::try_from(prior_failures).unwrap_or(0).min(16);
    let capped = base_ms.saturating_mul(1 << exp).min(max_ms);
    let jitter = rand::thread_rng().gen_range(0..=capped / 4);
    capped + jitter
}
