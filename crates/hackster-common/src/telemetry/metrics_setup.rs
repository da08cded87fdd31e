//! Prometheus metrics setup and recording helpers
//!
//! Each process installs the recorder once at startup; the rendered text is
//! served by that process's own /metrics endpoint.

use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Result;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

const EVENTS_PROCESSED_TOTAL: &str = "hackster_events_processed_total";
const EVENT_ATTEMPT_DURATION_SECONDS: &str = "hackster_event_attempt_duration_seconds";
const EVENT_RETRIES_TOTAL: &str = "hackster_event_retries_total";
const EVENTS_DROPPED_TOTAL: &str = "hackster_events_dropped_total";
const DEAD_LETTERS_TOTAL: &str = "hackster_dead_letters_total";
const QUEUE_DEPTH_GAUGE: &str = "hackster_event_queue_depth";
const HTTP_REQUESTS_TOTAL: &str = "hackster_http_requests_total";
const HTTP_REQUEST_DURATION_SECONDS: &str = "hackster_http_request_duration_seconds";
const NOTIFICATIONS_SENT_TOTAL: &str = "hackster_notifications_sent_total";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder for this process
pub fn init_metrics() -> Result<()> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Render current metrics in Prometheus text format
///
/// Returns `None` when the recorder was never installed.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

/// One event reached a terminal outcome
pub fn register_event_processed(kind: &str, outcome: &str, elapsed: Duration) {
    counter!(
        EVENTS_PROCESSED_TOTAL,
        "kind" => kind.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        EVENT_ATTEMPT_DURATION_SECONDS,
        "kind" => kind.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// One attempt failed transiently and was rescheduled
pub fn register_event_retry(kind: &str) {
    counter!(EVENT_RETRIES_TOTAL, "kind" => kind.to_string()).increment(1);
}

/// An inbound event was dropped before reaching the queue
pub fn register_event_dropped(reason: &str) {
    counter!(EVENTS_DROPPED_TOTAL, "reason" => reason.to_string()).increment(1);
}

/// An event exhausted its retry budget
pub fn register_dead_letter(kind: &str) {
    counter!(DEAD_LETTERS_TOTAL, "kind" => kind.to_string()).increment(1);
}

/// Queue rows currently pending or processing
pub fn set_queue_depth(depth: i64) {
    gauge!(QUEUE_DEPTH_GAUGE).set(depth.max(0) as f64);
}

/// One HTTP request completed
pub fn register_http_request(method: &str, route: &str, status: u16, elapsed: Duration) {
    let status = status.to_string();

    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status
    )
    .record(elapsed.as_secs_f64());
}

/// One webhook notification attempt finished
pub fn register_notification(sink: &str, result: &str) {
    counter!(
        NOTIFICATIONS_SENT_TOTAL,
        "sink" => sink.to_string(),
        "result" => result.to_string()
    )
    .increment(1);
}
