use anyhow::Context;
use clap::Parser;
use rss_notifier::config::DEFAULT_CONFIG_PATH;
use rss_notifier::{
    Config, DeliveryCoordinator, DryRunNotifier, FeedSource, Notifier, RssFeedSource,
    RunCounters, SentLedger, SlackWebhookNotifier,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Forward new RSS items to a Slack webhook
#[derive(Debug, Parser)]
#[command(name = "rss-notifier", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Sent-news ledger file (overrides `sent_news_file` from the config)
    #[arg(long)]
    ledger: Option<PathBuf>,

    /// Maximum notifications for this run (overrides `max_news_count`)
    #[arg(long)]
    max_news_count: Option<usize>,

    /// Fetch and count items without sending anything or touching the ledger
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(counters) => {
            info!(
                "RSS Notifier finished: {} sent, {} unsent",
                counters.total_sent_count, counters.unsent_item_count
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<RunCounters> {
    let mut config = Config::load(&cli.config).context("Failed to load config")?;
    config.apply_env_overrides();
    if let Some(max_news_count) = cli.max_news_count {
        config.max_news_count = max_news_count;
    }
    if let Some(ledger) = cli.ledger {
        config.sent_news_file = ledger;
    }

    let notifier: Arc<dyn Notifier> = if cli.dry_run {
        info!("Dry run: nothing will be sent or recorded");
        config.validate_timeouts().context("Invalid timeout configuration")?;
        Arc::new(DryRunNotifier)
    } else {
        config.validate().context("Invalid configuration")?;
        Arc::new(SlackWebhookNotifier::with_timeout(
            config.slack_webhook.clone(),
            Duration::from_secs(config.delivery_timeout_seconds),
        )?)
    };

    let mut ledger = if cli.dry_run {
        SentLedger::open_read_only(config.sent_news_file.clone())
    } else {
        SentLedger::open(config.sent_news_file.clone())
    }
    .context("Failed to initialize sent news file")?;

    let source: Arc<dyn FeedSource> = Arc::new(RssFeedSource::new(config.fetch_config())?);
    let coordinator =
        DeliveryCoordinator::new(source, notifier, config.rss_feeds.clone(), config.max_news_count);

    Ok(coordinator.run(&mut ledger).await)
}
