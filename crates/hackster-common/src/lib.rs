//! # hackster-common
//!
//! Shared utilities including configuration, error handling, telemetry, and
//! outbound notifications.

pub mod config;
pub mod error;
pub mod notify;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, AuthConfig, BridgeConfig, ConfigError, CorsConfig, DatabaseConfig,
    Environment, NotifyConfig, ServerConfig, git_commit,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use notify::Notifier;
pub use telemetry::{
    init_metrics, render_metrics, try_init_tracing, try_init_tracing_with_config, TracingConfig,
    TracingError,
};
