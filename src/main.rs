use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;

use pagefeed::config::{load_channels, SourceConfig};
use pagefeed::pipeline::Pipeline;
use pagefeed::render::render_rss;
use pagefeed::store::FeedStore;

#[derive(Parser, Debug)]
#[command(
    name = "pagefeed",
    about = "Turns arbitrary web pages into incrementally-updated RSS feeds"
)]
struct Args {
    /// Channel id to refresh (a key in the channels file)
    channel: Option<String>,

    /// Refresh every configured channel
    #[arg(long, conflicts_with = "channel")]
    all: bool,

    /// Path to the channels file
    #[arg(long, value_name = "FILE", default_value = "channels.json")]
    config: PathBuf,

    /// Directory holding per-channel feed state
    #[arg(long, value_name = "DIR", default_value = "rss_feeds")]
    data_dir: PathBuf,

    /// Run extraction and dedup without persisting the result
    #[arg(long)]
    preview: bool,

    /// Print the stored feed as RSS without fetching anything
    #[arg(long, conflicts_with_all = ["all", "preview"])]
    render: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let channels = load_channels(&args.config)
        .with_context(|| format!("Failed to load channels from {}", args.config.display()))?;

    let store = FeedStore::new(&args.data_dir);
    let pipeline = Pipeline::new(reqwest::Client::new(), store);

    if args.all {
        // Channels refresh concurrently; the per-source locks inside the
        // pipeline keep same-channel work serialized. One channel's failure
        // never aborts the others.
        let persist = !args.preview;
        let results: Vec<_> = stream::iter(channels.iter())
            .map(|(id, config)| {
                let pipeline = &pipeline;
                async move { (id.as_str(), pipeline.refresh(id, config, persist).await) }
            })
            .buffer_unordered(4)
            .collect()
            .await;

        for (id, result) in results {
            match result {
                Ok(outcome) => {
                    println!("{}: {} new items", id, outcome.new_items);
                }
                Err(e) if e.is_empty_extraction() => {
                    tracing::warn!(channel = %id, "{}", e);
                    println!("{id}: no posts extracted");
                }
                Err(e) => {
                    tracing::error!(channel = %id, error = %e, "Refresh failed");
                    eprintln!("{id}: {e}");
                }
            }
        }
        return Ok(());
    }

    let id = args
        .channel
        .as_deref()
        .context("Specify a channel id, or --all to refresh every channel")?;
    let config: &SourceConfig = channels
        .get(id)
        .with_context(|| format!("Channel {id:?} not found in {}", args.config.display()))?;

    if args.render {
        // Read-side only: print the stored state, fetch nothing.
        let feed = pipeline.store().load(id, id, &config.url).await;
        print!("{}", render_rss(&feed));
        return Ok(());
    }

    match pipeline.refresh(id, config, !args.preview).await {
        Ok(outcome) => {
            print!("{}", render_rss(&outcome.feed));
            Ok(())
        }
        Err(e) if e.is_empty_extraction() => {
            // Selector drift is informational: report it, keep exit clean.
            tracing::warn!(channel = %id, "{}", e);
            eprintln!("{e}");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to refresh channel {id:?}")),
    }
}
