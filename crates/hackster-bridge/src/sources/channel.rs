//! In-process event source
//!
//! Used when no gateway token is configured (the bridge then runs as a pure
//! queue worker) and by tests that feed the ingest loop directly.

use async_trait::async_trait;
use tokio::sync::mpsc;

use hackster_core::events::ChatEvent;

use super::EventSource;

/// Event source fed through an in-process channel
pub struct ChannelEventSource {
    rx: mpsc::Receiver<ChatEvent>,
}

impl ChannelEventSource {
    /// Returns the feeding half alongside the source. Dropping every sender
    /// ends the source.
    #[must_use]
    pub fn new(capacity: usize) -> (mpsc::Sender<ChatEvent>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn next_event(&mut self) -> Option<ChatEvent> {
        self.rx.recv().await
    }

    fn close(&mut self) {
        self.rx.close();
    }
}
