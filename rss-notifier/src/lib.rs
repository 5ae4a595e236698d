pub mod types;
pub mod config;
pub mod ledger;
pub mod fetcher;
pub mod parser;
pub mod traits;
pub mod sources;
pub mod notifier;
pub mod coordinator;

pub use types::*;
pub use config::Config;
pub use ledger::SentLedger;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use traits::{FeedSource, Notifier};
pub use sources::RssFeedSource;
pub use notifier::{DryRunNotifier, SlackWebhookNotifier};
pub use coordinator::{format_item_message, limit_summary, DeliveryCoordinator};
