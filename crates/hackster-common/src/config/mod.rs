//! Configuration structs

mod app_config;

pub use app_config::{
    git_commit, AppConfig, AppSettings, AuthConfig, BridgeConfig, ConfigError, CorsConfig,
    DatabaseConfig, Environment, NotifyConfig, ServerConfig,
};
