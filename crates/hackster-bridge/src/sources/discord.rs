//! Chat platform gateway source
//!
//! One shard; reconnect, resume, and heartbeats are the shard's problem.
//! Only the five gateway event types the state machine consumes are mapped;
//! everything else is discarded here so it never touches the queue.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};
use twilight_gateway::{CloseFrame, Event, EventTypeFlags, Intents, Shard, StreamExt};
use twilight_model::gateway::ShardId;

use hackster_core::events::{ChatEvent, EventKind};
use hackster_core::value_objects::Snowflake;

use super::EventSource;

/// Gateway event source backed by a single shard
pub struct DiscordEventSource {
    shard: Shard,
}

impl DiscordEventSource {
    /// Build the source; the shard dials on first poll
    #[must_use]
    pub fn new(token: String) -> Self {
        let intents = Intents::GUILDS
            | Intents::GUILD_MEMBERS
            | Intents::GUILD_MESSAGES
            | Intents::GUILD_MODERATION
            | Intents::MESSAGE_CONTENT;

        Self {
            shard: Shard::new(ShardId::ONE, token, intents),
        }
    }
}

#[async_trait]
impl EventSource for DiscordEventSource {
    async fn next_event(&mut self) -> Option<ChatEvent> {
        while let Some(item) = self.shard.next_event(EventTypeFlags::all()).await {
            let event = match item {
                Ok(event) => event,
                Err(source) => {
                    // The shard reconnects on its own; only the stream
                    // ending is fatal
                    warn!(error = %source, "Gateway receive error");
                    continue;
                }
            };

            if let Some(mapped) = map_event(event) {
                return Some(mapped);
            }
        }

        None
    }

    fn close(&mut self) {
        let _ = self.shard.sender().close(CloseFrame::NORMAL);
    }
}

/// Reduce a gateway event to the normalized shape, or discard it
///
/// Dedup tokens must be stable across gateway redelivery: message ids are
/// platform-unique already, member events get composite tokens built from
/// ids the platform resends unchanged.
fn map_event(event: Event) -> Option<ChatEvent> {
    match event {
        Event::MemberAdd(payload) => {
            let user = &payload.member.user;
            let joined_at = payload.member.joined_at.map_or(0, |t| t.as_secs());
            Some(ChatEvent::new(
                EventKind::Join,
                Snowflake::new(user.id.get() as i64),
                join_token(payload.guild_id.get(), user.id.get(), joined_at),
                json!({
                    "username": user.name,
                    "guild_id": payload.guild_id.get().to_string(),
                }),
            ))
        }
        Event::MessageCreate(message) => {
            if message.author.bot {
                return None;
            }
            Some(ChatEvent::new(
                EventKind::Message,
                Snowflake::new(message.author.id.get() as i64),
                message.id.get().to_string(),
                json!({
                    "username": message.author.name,
                    "channel_id": message.channel_id.get().to_string(),
                }),
            ))
        }
        Event::BanAdd(ban) => Some(ChatEvent::new(
            EventKind::Flag,
            Snowflake::new(ban.user.id.get() as i64),
            member_token("ban", ban.guild_id.get(), ban.user.id.get()),
            json!({ "username": ban.user.name }),
        )),
        Event::BanRemove(ban) => Some(ChatEvent::new(
            EventKind::Clear,
            Snowflake::new(ban.user.id.get() as i64),
            member_token("unban", ban.guild_id.get(), ban.user.id.get()),
            json!({ "username": ban.user.name }),
        )),
        Event::MemberRemove(removal) => Some(ChatEvent::new(
            EventKind::Retire,
            Snowflake::new(removal.user.id.get() as i64),
            member_token("leave", removal.guild_id.get(), removal.user.id.get()),
            json!({ "username": removal.user.name }),
        )),
        other => {
            debug!(kind = ?other.kind(), "Ignoring gateway event");
            None
        }
    }
}

fn join_token(guild_id: u64, user_id: u64, joined_at_secs: i64) -> String {
    format!("join:{guild_id}:{user_id}:{joined_at_secs}")
}

fn member_token(action: &str, guild_id: u64, user_id: u64) -> String {
    format!("{action}:{guild_id}:{user_id}")
}
