//! Health and metrics handlers
//!
//! Liveness, database readiness, and Prometheus exposition.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hackster_common::{git_commit, render_metrics};
use hackster_service::dto::HealthResponse;

use crate::state::AppState;

/// Liveness plus database readiness
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_healthy = state.services().pool().acquire().await.is_ok();

    let response = HealthResponse::evaluate(db_healthy, git_commit());
    let status = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Prometheus text exposition
///
/// GET /metrics
pub async fn metrics() -> Response {
    match render_metrics() {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        None => {
            (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response()
        }
    }
}
