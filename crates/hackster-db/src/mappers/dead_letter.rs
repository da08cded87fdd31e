//! Dead letter model -> entity mapper

use hackster_core::entities::DeadLetter;
use hackster_core::error::DomainError;
use hackster_core::events::EventKind;
use hackster_core::value_objects::Snowflake;

use crate::models::DeadLetterModel;

use super::corrupt_column;

impl TryFrom<DeadLetterModel> for DeadLetter {
    type Error = DomainError;

    fn try_from(model: DeadLetterModel) -> Result<Self, Self::Error> {
        let event_kind = model
            .event_kind
            .parse::<EventKind>()
            .map_err(|_| corrupt_column("dead_letters.event_kind", &model.event_kind))?;

        Ok(DeadLetter {
            id: model.id,
            event_kind,
            source_id: Snowflake::new(model.source_id),
            dedup_token: model.dedup_token,
            payload: model.payload,
            received_at: model.received_at,
            attempts: model.attempts,
            last_error: model.last_error,
            created_at: model.created_at,
        })
    }
}
