use crate::traits::FeedSource;
use crate::types::{FeedItem, FetchConfig, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::info;

/// Feed source backed by HTTP fetching and feed-rs parsing
pub struct RssFeedSource {
    fetcher: Fetcher,
    parser: FeedParser,
}

impl RssFeedSource {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
            parser: FeedParser::new(),
        })
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    fn source_name(&self) -> String {
        format!("RSS ({})", self.fetcher.config().user_agent)
    }

    async fn fetch_items(&self, feed_url: &str) -> Result<Vec<FeedItem>> {
        let content = self.fetcher.fetch_feed(feed_url).await?;
        let items = self.parser.parse_items(&content)?;

        info!("Pulled {} items from RSS feed {}", items.len(), feed_url);
        Ok(items)
    }
}
