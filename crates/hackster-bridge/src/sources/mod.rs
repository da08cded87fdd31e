//! Inbound event sources
//!
//! A source turns platform traffic into normalized `ChatEvent`s for the
//! ingest loop. The gateway source is the production path; the channel
//! source backs token-less local runs and tests.

mod channel;
mod discord;

pub use channel::ChannelEventSource;
pub use discord::DiscordEventSource;

use async_trait::async_trait;
use hackster_core::events::ChatEvent;

/// A stream of inbound chat events
#[async_trait]
pub trait EventSource: Send {
    /// Next event, or `None` once the source is closed and drained
    async fn next_event(&mut self) -> Option<ChatEvent>;

    /// Ask the source to disconnect cleanly. After this, `next_event`
    /// yields whatever is still buffered and then `None`.
    fn close(&mut self) {}
}
