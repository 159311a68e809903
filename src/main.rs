use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hedgerow_digest::aggregator::Aggregator;
use hedgerow_digest::config::Config;
use hedgerow_digest::fetcher::HttpFeedClient;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hedgerow_digest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Unexpected error while fetching feeds: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // Load configuration
    let config_path =
        std::env::var("HEDGEROW_CONFIG").unwrap_or_else(|_| "feeds.toml".to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path))?;
    info!("Loaded {} feeds from configuration", config.feeds.len());

    let client = HttpFeedClient::new(config.fetch_timeout())?;
    let aggregator = Aggregator::new(config, client);

    let summary = aggregator.run().await?;
    info!(
        "Done: {} feeds ok, {} failed, {} articles in {}",
        summary.feeds_ok,
        summary.feeds_failed,
        summary.items_written,
        summary.output_path.display()
    );

    Ok(())
}
