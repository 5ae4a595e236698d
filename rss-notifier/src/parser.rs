use crate::types::{FeedItem, NotifierError, Result};
use feed_rs::parser;
use tracing::debug;

/// Turns RSS/Atom documents into [`FeedItem`]s, keeping document order.
#[derive(Debug, Default)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_items(&self, content: &str) -> Result<Vec<FeedItem>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| NotifierError::Parse(format!("Failed to parse feed: {}", e)))?;

        let total = feed.entries.len();
        let items: Vec<FeedItem> = feed
            .entries
            .into_iter()
            .filter_map(|entry| self.parse_entry(entry))
            .collect();

        if items.len() < total {
            debug!("Skipped {} entries without a link", total - items.len());
        }
        Ok(items)
    }

    fn parse_entry(&self, entry: feed_rs::model::Entry) -> Option<FeedItem> {
        let identifier = Self::primary_link(&entry.links)?;

        let title = entry
            .title
            .map(|t| t.content.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string());

        Some(FeedItem {
            identifier,
            title,
            published_at: entry.published.or(entry.updated),
        })
    }

    /// The article link: first `alternate` (or rel-less) link, else the first link.
    fn primary_link(links: &[feed_rs::model::Link]) -> Option<String> {
        links
            .iter()
            .find(|link| matches!(link.rel.as_deref(), None | Some("alternate")))
            .or_else(|| links.first())
            .map(|link| link.href.trim().to_string())
            .filter(|href| !href.is_empty())
    }
}
