use std::{io::Write, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use transcript_store::{FsTranscriptStore, TranscriptStore};

use vc_bot::{
    cache::TranscriptCache,
    config::build_registry,
    openai::{OpenAIClient, DEFAULT_BASE_URL},
    registry::{Source, SourceKind},
    resolve::extract_video_id,
    session::{HistoryEntry, Session},
    tracing::init_tracing_subscriber,
    yt::{captions::CaptionFetcher, scraper::Scraper},
    Assistant, AssistantBuilder, LIBRARY_SOURCE_NAME,
};

type Bot = Assistant<OpenAIClient, Scraper, FsTranscriptStore, CaptionFetcher>;

#[derive(Parser)]
#[command(
    name = "vc-bot",
    about = "Ask VC/startup questions answered from a fixed knowledge base"
)]
struct Cli {
    /// OpenAI API key, required for asking questions
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    openai_base_url: String,

    /// Completion model
    #[arg(long, env = "VC_BOT_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    #[arg(long, env = "VC_BOT_MAX_TOKENS", default_value_t = 350)]
    max_tokens: u32,

    #[arg(long, env = "VC_BOT_TEMPERATURE", default_value_t = 0.4)]
    temperature: f32,

    /// Directory of cached `<video_id>.json` transcripts
    #[arg(long, env = "VC_BOT_TRANSCRIPTS_DIR", default_value = "transcripts")]
    transcripts_dir: PathBuf,

    /// JSON file with extra sources
    #[arg(long, env = "VC_BOT_SOURCES_FILE")]
    sources_file: Option<PathBuf>,

    /// Timeout applied to every scraping request
    #[arg(long, env = "VC_BOT_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    http_timeout_secs: u64,

    /// Timeout applied to completion requests
    #[arg(long, env = "VC_BOT_COMPLETION_TIMEOUT_SECS", default_value_t = 60)]
    completion_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a single question and exit
    Ask {
        /// Source to answer from; defaults to the first registered source
        #[arg(long, short, conflicts_with = "library")]
        source: Option<String>,
        /// Answer from every cached transcript instead of a single source
        #[arg(long)]
        library: bool,
        /// Mark the question as dictated
        #[arg(long)]
        voice: bool,
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive session
    Chat,
    /// List registered sources
    Sources,
    /// List cached transcripts
    Transcripts,
    /// Cache the transcript of a single video
    FetchTranscript { url: String },
    /// Cache the transcripts of every video on a channel's first listing page
    BulkFetch { channel: String },
}

impl Cli {
    async fn transcript_cache(
        &self,
    ) -> anyhow::Result<TranscriptCache<FsTranscriptStore, CaptionFetcher>> {
        let store = FsTranscriptStore::init(&self.transcripts_dir).await?;
        let scraper = self.scraper()?;

        Ok(TranscriptCache::new(store, CaptionFetcher::new(scraper.0)))
    }

    fn scraper(&self) -> anyhow::Result<Scraper> {
        Scraper::with_timeout(Duration::from_secs(self.http_timeout_secs))
            .context("Failed to build http client")
    }

    async fn assistant(&self) -> anyhow::Result<Bot> {
        let openai_key = self
            .openai_key
            .as_deref()
            .context("OPENAI_API_KEY not set")?;
        let openai = OpenAIClient::new(openai_key)
            .with_base_url(&self.openai_base_url)
            .with_model(&self.model)
            .with_timeout(Duration::from_secs(self.completion_timeout_secs))?;

        let scraper = self.scraper()?;
        let store = FsTranscriptStore::init(&self.transcripts_dir).await?;

        Ok(AssistantBuilder::new()
            .completer(openai)
            .documents(scraper.clone())
            .store(store)
            .transcript_fetcher(CaptionFetcher::new(scraper.0))
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build())
    }
}

fn print_entry(entry: &HistoryEntry) {
    println!("You ({}): {}", entry.source_name, entry.question);
    println!("VC Bot: {}\n", entry.answer);
}

fn print_sources(session: &Session) {
    for source in session.registry.iter() {
        println!("{:<32} {:<12} {}", source.name, source.kind, source.locator);
    }
}

/// Errors are shown inline; the session always continues.
fn report(err: impl Into<anyhow::Error>) {
    let err = err.into();
    tracing::error!(error = ?err, "Request failed");
    eprintln!("error: {err:#}");
}

async fn chat(bot: &Bot, session: &mut Session) -> anyhow::Result<()> {
    let mut selected = session
        .registry
        .first()
        .map(|s| s.name.clone())
        .context("No sources registered")?;

    println!("Ask any VC/startup question. Commands: /sources /use <name> /library /add <document|transcript> <url> <name> /history /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("[{selected}] > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("", _) => continue,
            ("/quit" | "/exit", _) => break,
            ("/sources", _) => print_sources(session),
            ("/history", _) => session.history.entries().iter().for_each(print_entry),
            ("/use", name) => match session.registry.get(name.trim()) {
                Some(source) => selected = source.name.clone(),
                None => eprintln!("error: unknown source {:?}", name.trim()),
            },
            ("/library", _) => selected = LIBRARY_SOURCE_NAME.to_string(),
            ("/add", args) => {
                let mut parts = args.trim().splitn(3, ' ');
                let (Some(kind), Some(url), Some(name)) = (parts.next(), parts.next(), parts.next())
                else {
                    eprintln!("usage: /add <document|transcript> <url> <name>");
                    continue;
                };

                match kind
                    .parse::<SourceKind>()
                    .and_then(|kind| Source::new(name, kind, url))
                    .and_then(|source| session.registry.add(source).map(|s| s.name.clone()))
                {
                    Ok(name) => println!("Added source: {name}"),
                    Err(e) => report(e),
                }
            }
            _ => {
                let answer = if selected == LIBRARY_SOURCE_NAME {
                    bot.ask_library(session, line, false).await
                } else {
                    bot.ask(session, &selected, line, false).await
                };

                match answer {
                    Ok(entry) => println!("VC Bot: {}\n", entry.answer),
                    Err(e) => report(e),
                }
            }
        }
    }

    session.end();

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let registry = build_registry(cli.sources_file.as_deref())?;
    let mut session = Session::new(registry);

    match &cli.command {
        Command::Ask {
            source,
            library,
            voice,
            question,
        } => {
            let bot = cli.assistant().await?;
            let question = question.join(" ");

            let entry = if *library {
                bot.ask_library(&mut session, &question, *voice).await?
            } else {
                let source = match source {
                    Some(source) => source.clone(),
                    None => session
                        .registry
                        .first()
                        .map(|s| s.name.clone())
                        .context("No sources registered")?,
                };
                bot.ask(&mut session, &source, &question, *voice).await?
            };

            println!("{}", entry.answer);
        }
        Command::Chat => {
            let bot = cli.assistant().await?;
            chat(&bot, &mut session).await?;
        }
        Command::Sources => print_sources(&session),
        Command::Transcripts => {
            let cache = cli.transcript_cache().await?;
            let mut transcripts = cache.load_all().await?;
            transcripts.sort_by(|a, b| a.video_id.cmp(&b.video_id));

            for transcript in transcripts {
                println!(
                    "{}  {:>5} segments  {}",
                    transcript.video_id,
                    transcript.segments.len(),
                    transcript.video_id.watch_url()
                );
            }
        }
        Command::FetchTranscript { url } => {
            let video_id = extract_video_id(url)
                .with_context(|| format!("No YouTube video id found in {url}"))?;
            let cache = cli.transcript_cache().await?;

            let already_cached = !cache
                .store()
                .get_existing_video_ids(&[video_id.as_str()])
                .await?
                .is_empty();
            let transcript = cache.get_or_fetch(&video_id).await?;

            if already_cached {
                println!("Already have {video_id}");
            } else {
                println!(
                    "Saved transcript for {video_id} ({} segments)",
                    transcript.segments.len()
                );
            }
        }
        Command::BulkFetch { channel } => {
            let cache = cli.transcript_cache().await?;
            let scraper = cli.scraper()?;

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_ctrl_c.cancel();
                }
            });

            let report = cache.bulk_fetch(&scraper, channel, &cancel).await?;
            println!(
                "Channel {}: {} saved, {} failed, {} already cached{}",
                report.channel_id,
                report.succeeded,
                report.failed,
                report.skipped,
                if report.cancelled { " (cancelled)" } else { "" }
            );
        }
    }

    Ok(())
}
