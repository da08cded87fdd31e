//! Record handlers
//!
//! Read endpoints over member records plus the manual status override.

use axum::{
    extract::{Path, State},
    Json,
};
use hackster_core::entities::RecordStatus;
use hackster_core::Snowflake;
use hackster_service::dto::{
    EventEntryResponse, ListResponse, OverrideStatusRequest, RecordResponse, RecordStatsResponse,
    TransitionResponse,
};
use hackster_service::{RecordService, TransitionService};

use crate::extractors::{Bounds, Operator, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

fn parse_record_id(raw: &str) -> ApiResult<Snowflake> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path("Invalid record id format"))
}

/// Get one record
///
/// GET /records/{record_id}
pub async fn get_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> ApiResult<Json<RecordResponse>> {
    let id = parse_record_id(&record_id)?;

    let service = RecordService::new(state.services());
    let response = service.get(id).await?;
    Ok(Json(response))
}

/// List records, optionally filtered by status
///
/// GET /records
pub async fn list_records(
    State(state): State<AppState>,
    bounds: Bounds,
) -> ApiResult<Json<ListResponse<RecordResponse>>> {
    let service = RecordService::new(state.services());
    let page = service
        .list(bounds.status, bounds.limit, bounds.offset)
        .await?;
    Ok(Json(page))
}

/// Audit trail for one record
///
/// GET /records/{record_id}/events
pub async fn record_events(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    bounds: Bounds,
) -> ApiResult<Json<ListResponse<EventEntryResponse>>> {
    let id = parse_record_id(&record_id)?;

    let service = RecordService::new(state.services());
    let page = service.events(id, bounds.limit).await?;
    Ok(Json(page))
}

/// Total and per-status record counts
///
/// GET /records/stats
pub async fn record_stats(State(state): State<AppState>) -> ApiResult<Json<RecordStatsResponse>> {
    let service = RecordService::new(state.services());
    let stats = service.stats().await?;
    Ok(Json(stats))
}

/// Force a record toward a target status
///
/// POST /records/{record_id}/status
///
/// Routes through the same transition path as gateway events, so a noop
/// (already in the target status) comes back 200 with `skipped_noop` rather
/// than an error.
pub async fn override_status(
    State(state): State<AppState>,
    _operator: Operator,
    Path(record_id): Path<String>,
    ValidatedJson(request): ValidatedJson<OverrideStatusRequest>,
) -> ApiResult<Json<TransitionResponse>> {
    let id = parse_record_id(&record_id)?;
    let target: RecordStatus = request.status.parse()?;

    let service = TransitionService::new(state.services());
    let response = service.override_status(id, target, request.reason).await?;
    Ok(Json(response))
}
