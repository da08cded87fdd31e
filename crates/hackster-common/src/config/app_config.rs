//! Application configuration structs
//!
//! Loads configuration from environment variables (plus a local `.env` file
//! in development). Both binaries share one config shape.

use serde::Deserialize;
use std::env;
use std::fmt;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub ops: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub bridge: BridgeConfig,
    pub notify: NotifyConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Server bind configuration (API server and bridge ops listener)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// API authentication configuration
///
/// A single operator bearer token; mutating endpoints require it.
#[derive(Clone)]
pub struct AuthConfig {
    pub api_token: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Event bridge tuning
#[derive(Clone)]
pub struct BridgeConfig {
    /// Chat platform gateway token; absent means no platform connection
    /// (channel source only, useful for local runs and tests)
    pub discord_token: Option<String>,
    pub workers: usize,
    pub max_attempts: i32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub attempt_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub visibility_timeout_secs: u64,
}

impl BridgeConfig {
    #[must_use]
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn visibility_timeout(&self) -> Duration {
        Duration::from_secs(self.visibility_timeout_secs)
    }
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("discord_token", &self.discord_token.as_ref().map(|_| "<redacted>"))
            .field("workers", &self.workers)
            .field("max_attempts", &self.max_attempts)
            .field("base_backoff_ms", &self.base_backoff_ms)
            .field("max_backoff_ms", &self.max_backoff_ms)
            .field("attempt_timeout_secs", &self.attempt_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("visibility_timeout_secs", &self.visibility_timeout_secs)
            .finish()
    }
}

/// Outbound notification sinks (both optional)
#[derive(Debug, Clone, Default)]
pub struct NotifyConfig {
    /// Operator/moderation channel webhook (Slack-shaped)
    pub ops_webhook_url: Option<String>,
    /// Error collector webhook
    pub errors_webhook_url: Option<String>,
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "hackster".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8080
}

fn default_ops_port() -> u16 {
    9090
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_workers() -> usize {
    4
}

fn default_max_attempts() -> i32 {
    5
}

fn default_base_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

fn default_attempt_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_visibility_timeout_secs() -> u64 {
    120
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: env_parse("API_PORT", default_api_port()),
                request_timeout_secs: env_parse(
                    "REQUEST_TIMEOUT_SECS",
                    default_request_timeout_secs(),
                ),
            },
            ops: ServerConfig {
                host: env::var("BRIDGE_OPS_HOST").unwrap_or_else(|_| default_host()),
                port: env_parse("BRIDGE_OPS_PORT", default_ops_port()),
                request_timeout_secs: default_request_timeout_secs(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env_parse("DATABASE_MAX_CONNECTIONS", default_max_connections()),
                min_connections: env_parse("DATABASE_MIN_CONNECTIONS", default_min_connections()),
                acquire_timeout_secs: env_parse(
                    "DATABASE_ACQUIRE_TIMEOUT_SECS",
                    default_acquire_timeout_secs(),
                ),
            },
            auth: AuthConfig {
                api_token: env::var("API_TOKEN").map_err(|_| ConfigError::MissingVar("API_TOKEN"))?,
            },
            bridge: BridgeConfig {
                discord_token: env::var("DISCORD_TOKEN").ok().filter(|t| !t.is_empty()),
                workers: env_parse("BRIDGE_WORKERS", default_workers()),
                max_attempts: env_parse("BRIDGE_MAX_ATTEMPTS", default_max_attempts()),
                base_backoff_ms: env_parse("BRIDGE_BASE_BACKOFF_MS", default_base_backoff_ms()),
                max_backoff_ms: env_parse("BRIDGE_MAX_BACKOFF_MS", default_max_backoff_ms()),
                attempt_timeout_secs: env_parse(
                    "BRIDGE_ATTEMPT_TIMEOUT_SECS",
                    default_attempt_timeout_secs(),
                ),
                poll_interval_ms: env_parse("BRIDGE_POLL_INTERVAL_MS", default_poll_interval_ms()),
                visibility_timeout_secs: env_parse(
                    "BRIDGE_VISIBILITY_TIMEOUT_SECS",
                    default_visibility_timeout_secs(),
                ),
            },
            notify: NotifyConfig {
                ops_webhook_url: env::var("OPS_WEBHOOK_URL").ok().filter(|u| !u.is_empty()),
                errors_webhook_url: env::var("ERRORS_WEBHOOK_URL").ok().filter(|u| !u.is_empty()),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        })
    }

    /// Validate relationships the per-field parsers cannot see
    ///
    /// # Errors
    /// Returns an error describing the first invalid value found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.port == 0 {
            return Err(ConfigError::InvalidValue("API_PORT", "must not be 0".into()));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "REQUEST_TIMEOUT_SECS",
                "must be at least 1".into(),
            ));
        }
        if self.bridge.workers == 0 {
            return Err(ConfigError::InvalidValue("BRIDGE_WORKERS", "must be at least 1".into()));
        }
        if self.bridge.max_attempts < 1 {
            return Err(ConfigError::InvalidValue(
                "BRIDGE_MAX_ATTEMPTS",
                "must be at least 1".into(),
            ));
        }
        if self.bridge.base_backoff_ms == 0 || self.bridge.base_backoff_ms > self.bridge.max_backoff_ms
        {
            return Err(ConfigError::InvalidValue(
                "BRIDGE_BASE_BACKOFF_MS",
                format!(
                    "must be between 1 and BRIDGE_MAX_BACKOFF_MS ({})",
                    self.bridge.max_backoff_ms
                ),
            ));
        }
        if self.bridge.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "BRIDGE_POLL_INTERVAL_MS",
                "must be at least 1".into(),
            ));
        }
        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MAX_CONNECTIONS",
                "must be >= DATABASE_MIN_CONNECTIONS".into(),
            ));
        }
        Ok(())
    }
}

/// Deployed commit hash, recorded by the deploy script
#[must_use]
pub fn git_commit() -> String {
    env::var("GIT_COMMIT").unwrap_or_else(|_| "unknown".to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
