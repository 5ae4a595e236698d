use crate::types::{FetchConfig, NotifierError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const DEFAULT_SENT_NEWS_FILE: &str = "sent_news.txt";
pub const WEBHOOK_ENV_VAR: &str = "SLACK_WEBHOOK";

fn default_sent_news_file() -> PathBuf {
    PathBuf::from(DEFAULT_SENT_NEWS_FILE)
}

fn default_user_agent() -> String {
    FetchConfig::default().user_agent
}

fn default_fetch_timeout_seconds() -> u64 {
    FetchConfig::default().timeout_seconds
}

fn default_delivery_timeout_seconds() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rss_feeds: Vec<String>,
    #[serde(default)]
    pub slack_webhook: String,
    #[serde(default)]
    pub max_news_count: usize,
    #[serde(default = "default_sent_news_file")]
    pub sent_news_file: PathBuf,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_fetch_timeout_seconds")]
    pub fetch_timeout_seconds: u64,
    #[serde(default = "default_delivery_timeout_seconds")]
    pub delivery_timeout_seconds: u64,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            NotifierError::Config(format!("error reading config file {}: {}", path.display(), e))
        })?;

        let config = Self::from_yaml(&data)?;
        info!(
            "Loaded config from {} ({} feeds, max_news_count={})",
            path.display(),
            config.rss_feeds.len(),
            config.max_news_count
        );
        Ok(config)
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(data)?)
    }

    /// Replaces the configured webhook with the `SLACK_WEBHOOK` environment
    /// value when that is set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        self.apply_webhook_override(std::env::var(WEBHOOK_ENV_VAR).ok());
    }

    pub fn apply_webhook_override(&mut self, value: Option<String>) {
        if let Some(webhook) = value.filter(|v| !v.trim().is_empty()) {
            debug!("Using webhook from {}", WEBHOOK_ENV_VAR);
            self.slack_webhook = webhook;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_timeouts()?;

        if self.slack_webhook.trim().is_empty() {
            return Err(NotifierError::MissingWebhook);
        }

        let parsed = Url::parse(&self.slack_webhook)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NotifierError::Config(format!(
                "webhook must be an http(s) URL, got scheme {}",
                parsed.scheme()
            )));
        }

        Ok(())
    }

    /// Both timeouts must be non-zero.
    pub fn validate_timeouts(&self) -> Result<()> {
        if self.fetch_timeout_seconds == 0 {
            return Err(NotifierError::Config(
                "fetch_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.delivery_timeout_seconds == 0 {
            return Err(NotifierError::Config(
                "delivery_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            timeout_seconds: self.fetch_timeout_seconds,
            ..FetchConfig::default()
        }
    }
}
