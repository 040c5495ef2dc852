use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dscout_collect::{Collector, RunResult};
use dscout_core::{default_keywords, AppConfig, Platform, SearchRequest};
use dscout_export::{default_stem, ResultStore};
use dscout_sources::build_sources;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dscout")]
#[command(about = "Discover product demand signals across community platforms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a batch keyword search and export the merged results.
    Collect(CollectArgs),
}

#[derive(Debug, Args)]
struct CollectArgs {
    /// Comma-separated keywords. Defaults to the stock tool-discovery list.
    #[arg(long, value_delimiter = ',')]
    keywords: Vec<String>,

    /// Comma-separated platforms (zhihu, v2ex, producthunt). Overrides
    /// --mode when given.
    #[arg(long, value_delimiter = ',')]
    platforms: Vec<Platform>,

    /// Platform preset: quick = v2ex only, standard = zhihu + v2ex,
    /// full = every registered platform.
    #[arg(long, value_enum, default_value = "standard")]
    mode: Mode,

    /// Per-platform, per-keyword result cap.
    #[arg(long, default_value_t = SearchRequest::DEFAULT_LIMIT)]
    limit: usize,

    /// Output file stem; the extension is chosen by the winning writer.
    /// Defaults to demand_results_<run timestamp>.
    #[arg(long)]
    output: Option<String>,

    /// Override the pacing delay between calls to the same platform.
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Quick,
    Standard,
    Full,
}

impl Mode {
    fn platforms(self) -> Vec<Platform> {
        match self {
            Mode::Quick => vec![Platform::V2ex],
            Mode::Standard => vec![Platform::Zhihu, Platform::V2ex],
            Mode::Full => Platform::ALL.to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = dscout_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    match cli.command {
        Commands::Collect(args) => collect(&config, args).await,
    }
}

async fn collect(config: &AppConfig, args: CollectArgs) -> anyhow::Result<()> {
    let keywords = if args.keywords.is_empty() {
        default_keywords()
    } else {
        args.keywords
    };
    let platforms = if args.platforms.is_empty() {
        args.mode.platforms()
    } else {
        args.platforms
    };
    let request = SearchRequest::new(keywords, &platforms, args.limit);

    let sources =
        build_sources(config, &request.platforms).context("failed to build source adapters")?;
    let delay = Duration::from_millis(args.delay_ms.unwrap_or(config.pace_delay_ms));

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received — finishing the in-flight call, then stopping");
            signal_token.cancel();
        }
    });

    let mut collector = Collector::new(sources, delay, cancel);
    let result = collector.run(&request).await;

    render_report(&result);

    let store = ResultStore::new(config.output_dir.clone());
    let stem = args
        .output
        .unwrap_or_else(|| default_stem(result.started_at));
    let saved = store.save(&result.records, &stem).with_context(|| {
        format!(
            "failed to persist {} accumulated records",
            result.records.len()
        )
    })?;

    match saved {
        Some(export) => println!(
            "saved {} records to {} ({})",
            export.rows,
            export.path.display(),
            export.format
        ),
        None => println!("nothing to persist — no demand records were found"),
    }

    Ok(())
}

fn render_report(result: &RunResult) {
    let cancelled = if result.cancelled {
        " (cancelled early)"
    } else {
        ""
    };
    println!(
        "discovered {} demand records across {} calls{cancelled}",
        result.records.len(),
        result.outcomes.len()
    );
    for (platform, tally) in result.tally() {
        if tally.failed == 0 {
            println!(
                "  {platform}: {} records from {} calls",
                tally.records, tally.succeeded
            );
        } else {
            let kinds: Vec<String> = tally
                .failure_kinds
                .iter()
                .map(|(kind, count)| format!("{kind} x{count}"))
                .collect();
            println!(
                "  {platform}: {} records from {} calls, {} failed ({})",
                tally.records,
                tally.succeeded,
                tally.failed,
                kinds.join(", ")
            );
        }
    }
}
