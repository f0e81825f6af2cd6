use std::{path::PathBuf, str::FromStr, time::Duration};

use apalis::{
    layers::{retry::RetryPolicy, sentry::SentryLayer},
    prelude::*,
};
use apalis_cron::{CronStream, Tick};
use clap::{Parser, Subcommand};
use cron::Schedule;
use tokio_util::sync::CancellationToken;
use transcript_store::FsTranscriptStore;
use vc_bot::{
    cache::TranscriptCache,
    tracing::init_tracing_subscriber,
    yt::{captions::CaptionFetcher, scraper::Scraper},
};

#[derive(Parser)]
#[command(
    name = "vc-bot-sync",
    about = "Keeps the transcript cache in step with a set of YouTube channels"
)]
struct Cli {
    /// Channel handles or URLs, comma separated
    #[arg(long, env = "VC_BOT_CHANNELS", value_delimiter = ',', required = true)]
    channels: Vec<String>,

    /// Directory of cached `<video_id>.json` transcripts
    #[arg(long, env = "VC_BOT_TRANSCRIPTS_DIR", default_value = "transcripts")]
    transcripts_dir: PathBuf,

    /// Timeout applied to every scraping request
    #[arg(long, env = "VC_BOT_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    http_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync every channel once and exit
    Run,
    /// Start the cron scheduler
    Cron {
        /// Cron schedule expression
        #[arg(long, env = "CRON_SCHEDULE", default_value = "0 0 */6 * * *")]
        schedule: String,
    },
}

#[derive(Clone)]
struct Config {
    channels: Vec<String>,
    transcripts_dir: PathBuf,
    http_timeout: Duration,
}

/// Bulk-fetches each channel in turn. A channel that cannot be resolved is
/// logged and skipped so the remaining channels still sync.
async fn run_sync(config: &Config, cancel: &CancellationToken) -> anyhow::Result<()> {
    let store = FsTranscriptStore::init(&config.transcripts_dir).await?;
    let scraper = Scraper::with_timeout(config.http_timeout)?;
    let cache = TranscriptCache::new(store, CaptionFetcher::new(scraper.0.clone()));

    for channel in &config.channels {
        if cancel.is_cancelled() {
            break;
        }

        match cache.bulk_fetch(&scraper, channel, cancel).await {
            Ok(report) => tracing::info!(
                %channel,
                channel_id = %report.channel_id,
                succeeded = report.succeeded,
                failed = report.failed,
                skipped = report.skipped,
                "Channel synced"
            ),
            Err(e) => tracing::error!(%channel, error = ?e, "Failed to sync channel"),
        }
    }

    Ok(())
}

async fn handle_tick(_tick: Tick, config: Data<Config>) -> anyhow::Result<()> {
    tracing::info!(
        channels = config.channels.len(),
        "Running scheduled transcript sync..."
    );
    run_sync(&config, &CancellationToken::new()).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let config = Config {
        channels: cli.channels,
        transcripts_dir: cli.transcripts_dir,
        http_timeout: Duration::from_secs(cli.http_timeout_secs),
    };

    match cli.command {
        Command::Run => {
            tracing::info!(channels = config.channels.len(), "Running transcript sync once...");

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_ctrl_c.cancel();
                }
            });

            run_sync(&config, &cancel).await?;
        }
        Command::Cron { schedule } => {
            tracing::info!(%schedule, "Starting cron scheduler...");
            let schedule = Schedule::from_str(&schedule)?;

            let worker = WorkerBuilder::new("vc-bot-sync-cron")
                .backend(CronStream::new(schedule))
                .retry(RetryPolicy::retries(3))
                .layer(SentryLayer::new())
                .data(config)
                .build(handle_tick);

            worker.run().await?;
        }
    }

    Ok(())
}
