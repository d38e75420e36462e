//! Webhook notification sink.
//!
//! Messages are posted as Slack-style incoming-webhook JSON. Delivery is
//! best-effort: transport failures are logged and swallowed, never
//! propagated into the scan run.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::config::WebhookConfig;
use crate::error::{Result, ScandiffError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A notification sink for scan reports.
///
/// `send` is infallible: implementations own their failure handling and
/// callers never branch on delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one plain-text message, best-effort.
    async fn send(&self, text: &str);
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    channel: &'a str,
    username: &'a str,
    text: &'a str,
}

/// Posts messages to a Slack-style incoming webhook.
pub struct WebhookNotifier {
    config: WebhookConfig,
    http: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("scandiff/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScandiffError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, text: &str) {
        if self.config.url.is_empty() {
            tracing::debug!("No webhook URL configured, skipping notification");
            return;
        }

        let payload = WebhookPayload {
            channel: &self.config.channel,
            username: &self.config.username,
            text,
        };

        match self.http.post(&self.config.url).json(&payload).send().await {
            Ok(res) if res.status().is_success() => {
                tracing::debug!("Notification delivered");
            }
            Ok(res) => {
                tracing::warn!(status = %res.status(), "Webhook returned an error status");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to deliver webhook notification");
            }
        }
    }
}

/// Message posted when a scan run begins.
pub fn scan_started_message(target: &str, started_at: NaiveDateTime) -> String {
    format!(
        "Nmap scan started for {target} at {}",
        started_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Wrap a rendered change summary (or sentinel) for delivery, naming the
/// target and date so multi-target reports stay unambiguous.
pub fn difference_message(target: &str, date: NaiveDate, body: &str) -> String {
    format!("Nmap difference discovered for {target} on {date}:\n\n{body}")
}
