use chrono::{DateTime, Utc};

/// A candidate item pulled from a feed. Never persisted; only its identifier
/// ends up in the sent ledger once it has been delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Stable identifier, the item's link URL.
    pub identifier: String,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl FeedItem {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            published_at: None,
        }
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Publication timestamp as rendered in notifications; empty when the feed
    /// did not provide one.
    pub fn published_display(&self) -> String {
        self.published_at
            .map(|dt| dt.to_rfc2822())
            .unwrap_or_default()
    }
}

/// Per-run bookkeeping handed back to the caller when a run completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Deliveries actually made this run.
    pub total_sent_count: usize,
    /// Items not present in the ledger, deferred ones included.
    pub unsent_item_count: usize,
    pub failed_feeds: usize,
    pub failed_deliveries: usize,
    pub summary_sent: bool,
}

impl RunCounters {
    /// Unseen items left for a later run.
    pub fn remaining(&self) -> usize {
        self.unsent_item_count.saturating_sub(self.total_sent_count)
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "RSS-Notifier/1.0".to_string(),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Slack webhook URL is not configured")]
    MissingWebhook,

    #[error("Ledger error at {path}: {source}")]
    Ledger {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch feed {url}: {reason}")]
    FeedFetch { url: String, reason: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Non-OK response from webhook: {status}, body: {body}")]
    Delivery { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NotifierError>;
