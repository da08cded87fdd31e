//! Event queue model -> entity mapper

use hackster_core::entities::{EventOrigin, QueueState, QueuedEvent};
use hackster_core::error::DomainError;
use hackster_core::events::EventKind;
use hackster_core::value_objects::Snowflake;

use crate::models::EventQueueModel;

use super::corrupt_column;

impl TryFrom<EventQueueModel> for QueuedEvent {
    type Error = DomainError;

    fn try_from(model: EventQueueModel) -> Result<Self, Self::Error> {
        let event_kind = model
            .event_kind
            .parse::<EventKind>()
            .map_err(|_| corrupt_column("event_queue.event_kind", &model.event_kind))?;
        let state = model
            .state
            .parse::<QueueState>()
            .map_err(|_| corrupt_column("event_queue.state", &model.state))?;
        let origin = model
            .origin
            .parse::<EventOrigin>()
            .map_err(|_| corrupt_column("event_queue.origin", &model.origin))?;

        Ok(QueuedEvent {
            id: model.id,
            event_kind,
            source_id: Snowflake::new(model.source_id),
            dedup_token: model.dedup_token,
            payload: model.payload,
            received_at: model.received_at,
            state,
            attempts: model.attempts,
            run_at: model.run_at,
            claimed_at: model.claimed_at,
            last_error: model.last_error,
            origin,
            created_at: model.created_at,
        })
    }
}
