//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{dead_letters, health, records, reports};
use crate::state::AppState;

/// Create the main API router with all domain routes
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health and metrics routes, mounted at the root
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(record_routes())
        .merge(report_routes())
        .merge(dead_letter_routes())
}

/// Record routes
fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/records", get(records::list_records))
        .route("/records/stats", get(records::record_stats))
        .route("/records/:record_id", get(records::get_record))
        .route("/records/:record_id/events", get(records::record_events))
        .route("/records/:record_id/status", post(records::override_status))
}

/// Report routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", post(reports::submit_report))
        .route("/reports", get(reports::list_reports))
}

/// Dead letter routes
fn dead_letter_routes() -> Router<AppState> {
    Router::new().route("/dead-letters", get(dead_letters::list_dead_letters))
}
