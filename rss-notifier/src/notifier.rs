use crate::traits::Notifier;
use crate::types::{NotifierError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct SlackRequestBody<'a> {
    text: &'a str,
}

/// Posts messages to a Slack incoming webhook
pub struct SlackWebhookNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackWebhookNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(webhook_url, Duration::from_secs(DEFAULT_DELIVERY_TIMEOUT_SECS))
    }

    pub fn with_timeout(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, webhook_url))
    }

    pub fn with_client(client: Client, webhook_url: impl Into<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl Notifier for SlackWebhookNotifier {
    fn notifier_name(&self) -> String {
        "Slack webhook".to_string()
    }

    async fn deliver(&self, text: &str) -> Result<()> {
        let body = serde_json::to_vec(&SlackRequestBody { text })?;

        let response = self
            .client
            .post(&self.webhook_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifierError::Delivery {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Webhook accepted message ({} chars)", text.len());
        Ok(())
    }
}

/// Logs messages instead of sending them; every delivery succeeds.
#[derive(Debug, Default)]
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    fn notifier_name(&self) -> String {
        "dry run".to_string()
    }

    async fn deliver(&self, text: &str) -> Result<()> {
        info!("[dry-run] would send:\n{}", text);
        Ok(())
    }
}
