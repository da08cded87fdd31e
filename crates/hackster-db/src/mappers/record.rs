//! Member record model -> entity mapper

use hackster_core::entities::{MemberRecord, RecordStatus};
use hackster_core::error::DomainError;
use hackster_core::value_objects::Snowflake;

use crate::models::MemberRecordModel;

use super::corrupt_column;

impl TryFrom<MemberRecordModel> for MemberRecord {
    type Error = DomainError;

    fn try_from(model: MemberRecordModel) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse::<RecordStatus>()
            .map_err(|_| corrupt_column("member_records.status", &model.status))?;

        Ok(MemberRecord {
            id: Snowflake::new(model.id),
            username: model.username,
            status,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model(status: &str) -> MemberRecordModel {
        MemberRecordModel {
            id: 4321,
            username: Some("m4k".to_string()),
            status: status.to_string(),
            version: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_maps_valid_row() {
        let record = MemberRecord::try_from(model("flagged")).unwrap();
        assert_eq!(record.id, Snowflake::new(4321));
        assert_eq!(record.status, RecordStatus::Flagged);
        assert_eq!(record.version, 3);
    }

    #[test]
    fn test_rejects_corrupt_status() {
        let err = MemberRecord::try_from(model("exiled")).unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
        assert!(err.to_string().contains("member_records.status"));
    }
}
