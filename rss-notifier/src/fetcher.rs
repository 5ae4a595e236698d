use crate::types::{FetchConfig, NotifierError, Result};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// Downloads the raw feed document. Any non-success status, oversized
    /// body or transport failure is reported as a fetch error for `url`.
    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching feed: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifierError::FeedFetch {
                url: url.to_string(),
                reason: format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_feed_size_mb {
                return Err(NotifierError::FeedFetch {
                    url: url.to_string(),
                    reason: format!("Feed too large: {}MB", size_mb),
                });
            }
        }

        let content = response.text().await.map_err(|e| fetch_error(url, e))?;
        info!(
            "Fetched feed: {} ({} bytes in {}ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

fn fetch_error(url: &str, e: reqwest::Error) -> NotifierError {
    NotifierError::FeedFetch {
        url: url.to_string(),
        reason: e.to_string(),
    }
}
