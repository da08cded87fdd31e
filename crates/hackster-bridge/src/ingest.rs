//! Ingest loop - source to durable queue
//!
//! The only job here is getting events onto disk. The platform does not
//! redeliver, so an event that cannot be enqueued after a short retry burst
//! is lost; that loss is logged and counted, never silent.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use hackster_common::telemetry::register_event_dropped;
use hackster_core::entities::EventOrigin;
use hackster_core::events::ChatEvent;
use hackster_core::traits::EventQueueRepository;

use crate::sources::EventSource;

const ENQUEUE_ATTEMPTS: u32 = 3;
const ENQUEUE_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Pump the source into the queue until it closes or shutdown is signaled
pub async fn run_ingest(
    mut source: Box<dyn EventSource>,
    queue: Arc<dyn EventQueueRepository>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Ingest started");

    loop {
        tokio::select! {
            next = source.next_event() => {
                match next {
                    Some(event) => enqueue_with_retry(queue.as_ref(), &event).await,
                    None => {
                        info!("Event source closed");
                        break;
                    }
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    source.close();
                    // The close is async on the wire; drain what still
                    // arrives so nothing received is dropped
                    while let Some(event) = source.next_event().await {
                        enqueue_with_retry(queue.as_ref(), &event).await;
                    }
                    break;
                }
            }
        }
    }

    info!("Ingest stopped");
}

/// Enqueue one event, retrying transient failures a few times before
/// accepting the loss
pub(crate) async fn enqueue_with_retry(queue: &dyn EventQueueRepository, event: &ChatEvent) {
    for attempt in 1..=ENQUEUE_ATTEMPTS {
        match queue.enqueue(event, EventOrigin::Gateway).await {
            Ok(row) => {
                debug!(
                    queue_id = row.id,
                    kind = %event.kind,
                    source_id = %event.source_id,
                    "Event enqueued"
                );
                return;
            }
            Err(e) if attempt < ENQUEUE_ATTEMPTS => {
                warn!(error = %e, attempt, "Enqueue failed, retrying");
                tokio::time::sleep(ENQUEUE_RETRY_DELAY * attempt).await;
            }
            Err(e) => {
                error!(
                    error = %e,
                    kind = %event.kind,
                    source_id = %event.source_id,
                    dedup_token = %event.dedup_token,
                    "Dropping event after repeated enqueue failures"
                );
                register_event_dropped("enqueue_failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use hackster_core::entities::{QueueState, QueuedEvent};
    use hackster_core::error::DomainError;
    use hackster_core::events::EventKind;
    use hackster_core::traits::RepoResult;
    use hackster_core::value_objects::Snowflake;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Queue double: fails the first `failures` enqueues, then accepts
    struct FlakyQueue {
        failures: u32,
        calls: AtomicU32,
        accepted: Mutex<Vec<ChatEvent>>,
    }

    impl FlakyQueue {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                accepted: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EventQueueRepository for FlakyQueue {
        async fn enqueue(&self, event: &ChatEvent, origin: EventOrigin) -> RepoResult<QueuedEvent> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                return Err(DomainError::DatabaseError("connection reset".to_string()));
            }

            self.accepted.lock().unwrap().push(event.clone());
            Ok(QueuedEvent {
                id: i64::from(call),
                event_kind: event.kind,
                source_id: event.source_id,
                dedup_token: event.dedup_token.clone(),
                payload: event.payload.clone(),
                received_at: event.received_at,
                state: QueueState::Pending,
                attempts: 0,
                run_at: event.received_at,
                claimed_at: None,
                last_error: None,
                origin,
                created_at: event.received_at,
            })
        }

        async fn claim(&self) -> RepoResult<Option<QueuedEvent>> {
            Ok(None)
        }

        async fn ack(&self, _queue_id: i64) -> RepoResult<()> {
            Ok(())
        }

        async fn release(
            &self,
            _queue_id: i64,
            _next_run_at: DateTime<Utc>,
            _error: &str,
        ) -> RepoResult<()> {
            Ok(())
        }

        async fn bury(&self, _event: &QueuedEvent, _error: &str) -> RepoResult<()> {
            Ok(())
        }

        async fn reject(&self, _event: &QueuedEvent, _error: &str) -> RepoResult<()> {
            Ok(())
        }

        async fn requeue_stale(&self, _older_than: Duration) -> RepoResult<u64> {
            Ok(0)
        }

        async fn depth(&self) -> RepoResult<i64> {
            Ok(0)
        }
    }

    fn event(token: &str) -> ChatEvent {
        ChatEvent::new(
            EventKind::Join,
            Snowflake::new(7),
            token,
            serde_json::json!({"username": "newcomer"}),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_enqueue_succeeds_after_transient_failures() {
        let queue = FlakyQueue::new(2);
        enqueue_with_retry(&queue, &event("join:1:7:100")).await;

        assert_eq!(queue.calls(), 3);
        assert_eq!(queue.accepted.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enqueue_gives_up_after_budget() {
        let queue = FlakyQueue::new(u32::MAX);
        enqueue_with_retry(&queue, &event("join:1:7:100")).await;

        assert_eq!(queue.calls(), 3);
        assert!(queue.accepted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_pumps_source_until_it_closes() {
        use crate::sources::ChannelEventSource;

        let queue = Arc::new(FlakyQueue::new(0));
        let (tx, source) = ChannelEventSource::new(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        tx.send(event("join:1:7:100")).await.unwrap();
        tx.send(event("join:1:7:200")).await.unwrap();
        drop(tx);

        run_ingest(Box::new(source), Arc::clone(&queue) as Arc<dyn EventQueueRepository>, shutdown_rx)
            .await;

        let accepted = queue.accepted.lock().unwrap();
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].dedup_token, "join:1:7:100");
    }

    #[tokio::test]
    async fn test_ingest_drains_buffered_events_on_shutdown() {
        use crate::sources::ChannelEventSource;

        let queue = Arc::new(FlakyQueue::new(0));
        let (tx, source) = ChannelEventSource::new(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tx.send(event("join:1:7:100")).await.unwrap();
        shutdown_tx.send(true).unwrap();

        let handle = tokio::spawn(run_ingest(
            Box::new(source),
            Arc::clone(&queue) as Arc<dyn EventQueueRepository>,
            shutdown_rx,
        ));
        handle.await.unwrap();

        assert_eq!(queue.accepted.lock().unwrap().len(), 1);
    }
}
