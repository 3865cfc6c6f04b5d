use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use feedhook::delivery::WebhookSink;
use feedhook::feed::HttpFetcher;
use feedhook::{sync, Config};

#[derive(Parser, Debug)]
#[command(
    name = "feedhook",
    version,
    about = "Forward new RSS/Atom entries to webhooks"
)]
struct Args {
    /// Configuration file holding subscriptions and their checkpoints
    #[arg(long, env = "FEEDHOOK_CONFIG", default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let started = Utc::now();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;
    let fetcher = HttpFetcher::new(
        client.clone(),
        Duration::from_secs(config.fetch_timeout_secs),
    );
    let sink = WebhookSink::new(client);

    let report = sync::run(&config.subscriptions, &fetcher, &sink, started).await;
    config.subscriptions = report.subscriptions;

    config
        .save(&args.config)
        .with_context(|| format!("Failed to save config to {}", args.config.display()))?;

    Ok(())
}
