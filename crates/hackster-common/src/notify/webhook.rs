//! Fire-and-forget webhook notifications
//!
//! Two sinks: the operator channel (moderation visibility) and the error
//! collector. Sends are spawned and never awaited by callers; a failed or
//! unconfigured notification is logged and counted, never propagated. The
//! operation that triggered the notification must not observe its fate.

use std::time::Duration;

use tracing::{debug, error};

use hackster_core::sanitize::sanitize_webhook;

use crate::config::NotifyConfig;
use crate::error::{AppError, AppResult};
use crate::telemetry::register_notification;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// A single webhook destination
#[derive(Debug, Clone)]
pub struct Webhook {
    client: reqwest::Client,
    url: String,
    sink: &'static str,
}

impl Webhook {
    fn new(client: reqwest::Client, url: String, sink: &'static str) -> Self {
        Self { client, url, sink }
    }

    async fn send(&self, text: &str) -> Result<(), reqwest::Error> {
        let body = serde_json::json!({ "text": text });
        self.client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Notification fan-out with optional sinks
///
/// Dispatch methods spawn onto the current Tokio runtime, so they must be
/// called from within one.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    ops: Option<Webhook>,
    errors: Option<Webhook>,
}

impl Notifier {
    /// Build from config; unconfigured sinks stay disabled
    pub fn from_config(config: &NotifyConfig) -> AppResult<Self> {
        if config.ops_webhook_url.is_none() && config.errors_webhook_url.is_none() {
            return Ok(Self::disabled());
        }

        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        Ok(Self {
            ops: config
                .ops_webhook_url
                .clone()
                .map(|url| Webhook::new(client.clone(), url, "ops")),
            errors: config
                .errors_webhook_url
                .clone()
                .map(|url| Webhook::new(client.clone(), url, "errors")),
        })
    }

    /// A notifier with no sinks; every dispatch is a debug-logged drop
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Post to the operator channel
    pub fn ops(&self, text: impl Into<String>) {
        Self::dispatch("ops", self.ops.clone(), text.into());
    }

    /// Post to the error collector
    pub fn error(&self, text: impl Into<String>) {
        Self::dispatch("errors", self.errors.clone(), text.into());
    }

    fn dispatch(sink: &'static str, webhook: Option<Webhook>, text: String) {
        let Some(webhook) = webhook else {
            debug!(sink, "notification sink not configured, dropping message");
            return;
        };

        tokio::spawn(async move {
            // The receiving side cannot scope mentions, so defang before send
            let text = sanitize_webhook(&text);
            match webhook.send(&text).await {
                Ok(()) => {
                    debug!(sink = webhook.sink, "notification delivered");
                    register_notification(webhook.sink, "success");
                }
                Err(e) => {
                    error!(sink = webhook.sink, error = %e, "notification failed");
                    register_notification(webhook.sink, "error");
                }
            }
        });
    }
}
