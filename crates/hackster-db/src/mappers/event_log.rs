//! Event log model -> entity mapper

use hackster_core::entities::{EventLogEntry, EventOrigin, EventOutcome, RecordStatus};
use hackster_core::error::DomainError;
use hackster_core::events::EventKind;
use hackster_core::value_objects::Snowflake;

use crate::models::EventLogModel;

use super::corrupt_column;

fn parse_status(value: Option<&str>, column: &str) -> Result<Option<RecordStatus>, DomainError> {
    value
        .map(|s| s.parse::<RecordStatus>().map_err(|_| corrupt_column(column, s)))
        .transpose()
}

impl TryFrom<EventLogModel> for EventLogEntry {
    type Error = DomainError;

    fn try_from(model: EventLogModel) -> Result<Self, Self::Error> {
        let event_kind = model
            .event_kind
            .parse::<EventKind>()
            .map_err(|_| corrupt_column("event_log.event_kind", &model.event_kind))?;
        let outcome = model
            .outcome
            .parse::<EventOutcome>()
            .map_err(|_| corrupt_column("event_log.outcome", &model.outcome))?;
        let origin = model
            .origin
            .parse::<EventOrigin>()
            .map_err(|_| corrupt_column("event_log.origin", &model.origin))?;
        let status_before =
            parse_status(model.status_before.as_deref(), "event_log.status_before")?;
        let status_after = parse_status(model.status_after.as_deref(), "event_log.status_after")?;

        Ok(EventLogEntry {
            id: model.id,
            event_kind,
            source_id: Snowflake::new(model.source_id),
            dedup_token: model.dedup_token,
            outcome,
            status_before,
            status_after,
            detail: model.detail,
            origin,
            created_at: model.created_at,
        })
    }
}
