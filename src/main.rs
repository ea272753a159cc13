//! Council-Feed main entry point
//!
//! This is the command-line interface for the council blog aggregator.
//! It is meant to be invoked periodically by an external scheduler.

use anyhow::Context;
use clap::Parser;
use council_feed::config::load_config_with_hash;
use council_feed::crawler::{scrape, Pacing};
use council_feed::output::{dataset_statistics, print_statistics};
use council_feed::storage::{DatasetStore, JsonStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Council-Feed: a polite council blog aggregator
///
/// Council-Feed walks every council member's paginated blog, extracts the
/// posts, and merges them into a JSON dataset without rewriting posts it
/// has already stored.
#[derive(Parser, Debug)]
#[command(name = "council-feed")]
#[command(version)]
#[command(about = "A polite council blog aggregator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Write the dataset here instead of the configured dataset-path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Validate config and show what would be scraped without any network traffic
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the dataset and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(output) = &cli.output {
        config.output.dataset_path = output.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_scrape(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("council_feed=info,warn"),
            1 => EnvFilter::new("council_feed=debug,info"),
            2 => EnvFilter::new("council_feed=trace,debug"),
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

/// Handles the --dry-run mode: shows the roster and settings
fn handle_dry_run(config: &council_feed::Config) {
    let pacing = Pacing::from_config(&config.scraper);

    println!("=== Council-Feed Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Page delay: {:?}", pacing.page_delay);
    println!("  Source delay: {:?}", pacing.source_delay);
    println!(
        "  Request timeout: {}s",
        config.scraper.request_timeout_secs
    );
    println!(
        "  Max pages per source: {}",
        config.scraper.max_pages_per_source
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path);
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\nSources ({}):", config.sources.len());
    for source in &config.sources {
        println!("  {:>3} {} -> {}", source.id, source.name, source.blog_url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the dataset
fn handle_stats(config: &council_feed::Config) -> anyhow::Result<()> {
    println!("Dataset: {}\n", config.output.dataset_path);

    let store = JsonStore::new(&config.output.dataset_path);
    let dataset = store
        .load()
        .with_context(|| format!("failed to read dataset {}", config.output.dataset_path))?;

    print_statistics(&dataset_statistics(&dataset), &config.sources);

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: council_feed::Config) -> anyhow::Result<()> {
    tracing::info!(
        "Sources: {}, dataset: {}",
        config.sources.len(),
        config.output.dataset_path
    );

    let dataset_path = config.output.dataset_path.clone();
    let summary = scrape(config)
        .await
        .with_context(|| format!("scrape run failed writing {}", dataset_path))?;

    tracing::info!(
        "Run completed: {} new posts, {} total, failed sources: {:?}",
        summary.metadata.new_posts,
        summary.metadata.total_posts,
        summary.metadata.failed_sources
    );

    Ok(())
}
