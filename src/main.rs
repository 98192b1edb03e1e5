//! geo-readiness main entry point
//!
//! This is the command-line interface for the AI-search readiness auditor.

use anyhow::Context;
use clap::{Parser, Subcommand};
use geo_readiness::config::{load_config_with_hash, Config};
use geo_readiness::crawler::crawl;
use geo_readiness::output::{build_scorecard, format_scorecard_markdown, print_scorecard};
use geo_readiness::record::PageRecord;
use geo_readiness::storage::{
    write_json_artifact, JsonDirStore, Storage, SCORECARD_ARTIFACT, SCORECARD_MARKDOWN_ARTIFACT,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// geo-readiness: an AI-search readiness auditor
///
/// Crawls one website, extracts structural and semantic signals from every
/// page and scores each page on Answerability, Proof, Fan-out, Crawlability
/// and Trust.
#[derive(Parser, Debug)]
#[command(name = "geo-readiness")]
#[command(version = "1.0.0")]
#[command(about = "An AI-search readiness auditor for a single website", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the configured site, then score the crawled pages
    Crawl {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Override the page budget
        #[arg(long, value_name = "N")]
        max_pages: Option<usize>,

        /// Disable the headless-browser fallback
        #[arg(long)]
        no_render: bool,

        /// Override the output directory
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Skip scoring after the crawl
        #[arg(long)]
        no_score: bool,

        /// Validate config and show what would be crawled without crawling
        #[arg(long)]
        dry_run: bool,
    },

    /// Score a directory of page records
    Score {
        /// Directory holding `<slug>.json` page records
        #[arg(long, value_name = "DIR", default_value = "data/crawled")]
        input_dir: PathBuf,

        /// Where to write the scorecard JSON (default: inside the input directory)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl {
            config,
            max_pages,
            no_render,
            output_dir,
            no_score,
            dry_run,
        } => {
            tracing::info!("Loading configuration from: {}", config.display());
            let (mut cfg, hash) = load_config_with_hash(&config)
                .with_context(|| format!("Failed to load configuration {}", config.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);

            if let Some(max_pages) = max_pages {
                cfg.crawler.max_pages = max_pages;
            }
            if no_render {
                cfg.render.enabled = false;
            }
            if let Some(dir) = output_dir {
                cfg.output.directory = dir.display().to_string();
            }

            if dry_run {
                handle_dry_run(&cfg)
            } else {
                handle_crawl(cfg, hash, no_score).await
            }
        }
        Command::Score { input_dir, output } => handle_score(&input_dir, output.as_deref()),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("geo_readiness=info,warn"),
            1 => EnvFilter::new("geo_readiness=debug,info"),
            2 => EnvFilter::new("geo_readiness=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    geo_readiness::config::validate(config).context("Configuration is invalid")?;

    println!("=== geo-readiness Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Seeds ({}):", config.site.seeds.len());
    for seed in &config.site.seeds {
        println!("    * {}", seed);
    }

    println!("\nCrawler:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Follow sitemap: {}", config.crawler.follow_sitemap);

    println!("\nRender fallback:");
    println!("  Enabled: {}", config.render.enabled);
    println!("  Timeout: {}s", config.render.timeout_secs);
    println!("  Settle delay: {}ms", config.render.settle_ms);

    println!("\nUser Agent: {}", config.user_agent.header_value());
    println!("Output directory: {}", config.output.directory);
    println!("Checked bots: {}", config.policy.agents.join(", "));

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the crawl subcommand
async fn handle_crawl(config: Config, config_hash: String, no_score: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Target: {} ({} seed(s), budget {} pages)",
        config.site.base_url,
        config.site.seeds.len().max(1),
        config.crawler.max_pages
    );

    let outcome = crawl(config, Some(config_hash))
        .await
        .context("Crawl failed")?;
    println!(
        "✓ Crawled {} page(s) into {}",
        outcome.records.len(),
        outcome.store.root().display()
    );

    if no_score {
        return Ok(());
    }
    if outcome.records.is_empty() {
        tracing::warn!("No pages were crawled, skipping scoring");
        return Ok(());
    }
    write_scorecard(&outcome.store, &outcome.records, None)
}

/// Handles the score subcommand
fn handle_score(input_dir: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let store = JsonDirStore::open(input_dir);
    let loaded = store
        .load_pages()
        .with_context(|| format!("Failed to load page records from {}", input_dir.display()))?;

    if !loaded.skipped.is_empty() {
        tracing::warn!("Skipped {} malformed record file(s)", loaded.skipped.len());
    }
    tracing::info!("Scoring {} page(s)", loaded.records.len());

    write_scorecard(&store, &loaded.records, output)
}

/// Scores `records`, writes both scorecard artifacts and prints the table
fn write_scorecard(
    store: &JsonDirStore,
    records: &[PageRecord],
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let card = build_scorecard(records);

    match output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&card)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write scorecard to {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            write_json_artifact(store, SCORECARD_ARTIFACT, &card)
                .context("Failed to write scorecard")?;
        }
    }
    store
        .write_artifact(SCORECARD_MARKDOWN_ARTIFACT, &format_scorecard_markdown(&card))
        .context("Failed to write scorecard markdown")?;

    print_scorecard(&card);
    Ok(())
}
