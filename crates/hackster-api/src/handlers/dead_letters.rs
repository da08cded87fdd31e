//! Dead letter handlers

use axum::{extract::State, Json};
use hackster_service::dto::{DeadLetterResponse, ListResponse};
use hackster_service::DeadLetterService;

use crate::extractors::{Bounds, Operator};
use crate::response::ApiResult;
use crate::state::AppState;

/// List events that exhausted their delivery attempts
///
/// GET /dead-letters
pub async fn list_dead_letters(
    State(state): State<AppState>,
    _operator: Operator,
    bounds: Bounds,
) -> ApiResult<Json<ListResponse<DeadLetterResponse>>> {
    let service = DeadLetterService::new(state.services());
    let page = service.list(bounds.limit).await?;
    Ok(Json(page))
}
