//! Report model -> entity mapper

use hackster_core::entities::Report;
use hackster_core::value_objects::Snowflake;

use crate::models::ReportModel;

impl From<ReportModel> for Report {
    fn from(model: ReportModel) -> Self {
        Report {
            id: model.id,
            reporter_id: Snowflake::new(model.reporter_id),
            subject_id: model.subject_id.map(Snowflake::new),
            body: model.body,
            created_at: model.created_at,
        }
    }
}
