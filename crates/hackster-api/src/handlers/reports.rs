//! Report handlers
//!
//! Endpoints for submitting and reviewing member reports.

use axum::{extract::State, Json};
use hackster_service::dto::{CreateReportRequest, ListResponse, ReportResponse};
use hackster_service::ReportService;

use crate::extractors::{Bounds, Operator, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Submit a member report
///
/// POST /reports
pub async fn submit_report(
    State(state): State<AppState>,
    _operator: Operator,
    ValidatedJson(request): ValidatedJson<CreateReportRequest>,
) -> ApiResult<Created<Json<ReportResponse>>> {
    let service = ReportService::new(state.services());
    let response = service.submit(request).await?;
    Ok(Created(Json(response)))
}

/// List recent reports
///
/// GET /reports
pub async fn list_reports(
    State(state): State<AppState>,
    _operator: Operator,
    bounds: Bounds,
) -> ApiResult<Json<ListResponse<ReportResponse>>> {
    let service = ReportService::new(state.services());
    let page = service.list(bounds.limit).await?;
    Ok(Json(page))
}
