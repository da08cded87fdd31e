//! Telemetry - tracing and metrics setup

mod metrics_setup;
mod tracing_setup;

pub use metrics_setup::{
    init_metrics, register_dead_letter, register_event_dropped, register_event_processed,
    register_event_retry, register_http_request, register_notification, render_metrics,
    set_queue_depth,
};
pub use tracing_setup::{
    try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};
