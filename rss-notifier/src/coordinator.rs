use crate::ledger::SentLedger;
use crate::traits::{FeedSource, Notifier};
use crate::types::{FeedItem, RunCounters};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Message body sent for a single feed item.
pub fn format_item_message(item: &FeedItem) -> String {
    format!(
        "Title: {}\nLink: {}\nPublished: {}",
        item.title,
        item.identifier,
        item.published_display()
    )
}

/// Overflow summary for a finished run, if one should be sent.
///
/// Nothing is reported when every unseen item went out, or when nothing at all
/// was delivered (zero cap, or every delivery failed).
pub fn limit_summary(counters: &RunCounters) -> Option<String> {
    if counters.unsent_item_count > counters.total_sent_count && counters.total_sent_count > 0 {
        Some(format!(
            "Limit reached. Sent {} out of {} unsent news items. {} news items will be considered in the next run.",
            counters.total_sent_count,
            counters.unsent_item_count,
            counters.remaining()
        ))
    } else {
        None
    }
}

/// Walks the configured feeds in order and delivers unseen items until the
/// per-run cap is reached.
pub struct DeliveryCoordinator {
    source: Arc<dyn FeedSource>,
    notifier: Arc<dyn Notifier>,
    feeds: Vec<String>,
    max_news_count: usize,
}

impl DeliveryCoordinator {
    pub fn new(
        source: Arc<dyn FeedSource>,
        notifier: Arc<dyn Notifier>,
        feeds: Vec<String>,
        max_news_count: usize,
    ) -> Self {
        Self {
            source,
            notifier,
            feeds,
            max_news_count,
        }
    }

    /// Runs one full pass. The ledger is consulted and updated in memory for
    /// the whole run and is never re-read from disk.
    pub async fn run(&self, ledger: &mut SentLedger) -> RunCounters {
        let mut counters = RunCounters::default();

        info!(
            "Processing {} feeds via {} -> {} (cap {}, {} already sent)",
            self.feeds.len(),
            self.source.source_name(),
            self.notifier.notifier_name(),
            self.max_news_count,
            ledger.len()
        );

        for feed_url in &self.feeds {
            let items = match self.source.fetch_items(feed_url).await {
                Ok(items) => items,
                Err(e) => {
                    error!("Error fetching RSS feed {}: {}", feed_url, e);
                    counters.failed_feeds += 1;
                    continue;
                }
            };

            for item in &items {
                self.process_item(item, ledger, &mut counters).await;
            }
        }

        if let Some(summary) = limit_summary(&counters) {
            match self.notifier.deliver(&summary).await {
                Ok(()) => counters.summary_sent = true,
                Err(e) => warn!("Failed to send limit summary: {}", e),
            }
        }

        info!(
            "Run finished: sent {} of {} unsent items ({} left for next run, {} failed deliveries, {} failed feeds)",
            counters.total_sent_count,
            counters.unsent_item_count,
            counters.remaining(),
            counters.failed_deliveries,
            counters.failed_feeds
        );
        counters
    }

    async fn process_item(&self, item: &FeedItem, ledger: &mut SentLedger, counters: &mut RunCounters) {
        if ledger.contains(&item.identifier) {
            return;
        }

        counters.unsent_item_count += 1;
        if counters.total_sent_count >= self.max_news_count {
            debug!("Limit reached, deferring {}", item.identifier);
            return;
        }

        let message = format_item_message(item);
        if let Err(e) = self.notifier.deliver(&message).await {
            error!("Error sending notification for {}: {}", item.identifier, e);
            counters.failed_deliveries += 1;
            return;
        }
        counters.total_sent_count += 1;

        if let Err(e) = ledger.record(&item.identifier) {
            error!("Error recording {} in sent news file: {}", item.identifier, e);
        }
    }
}
