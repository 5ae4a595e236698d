use crate::types::{FeedItem, Result};
use async_trait::async_trait;

/// Something that can list the current items of a feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable name for log lines
    fn source_name(&self) -> String;

    /// Fetch the feed at `feed_url` and return its items in feed order
    async fn fetch_items(&self, feed_url: &str) -> Result<Vec<FeedItem>>;
}

/// Delivery endpoint for notification text.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn notifier_name(&self) -> String;

    /// Send `text`; `Ok` only when the endpoint accepted it
    async fn deliver(&self, text: &str) -> Result<()>;
}
