//! Sitefold main entry point
//!
//! This is the command-line interface for the Sitefold site text aggregator.

use anyhow::Context;
use clap::Parser;
use sitefold::config::load_config;
use sitefold::crawler::crawl;
use sitefold::output::{load_statistics, print_crawl_report, print_statistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitefold: a depth-bounded site text aggregator
///
/// Sitefold crawls a site from a root URL to a bounded depth, extracts page
/// text in the target language, deduplicates content by hash, and folds
/// everything into one merged master record per root.
#[derive(Parser, Debug)]
#[command(name = "sitefold")]
#[command(version = "1.0.0")]
#[command(about = "A depth-bounded site text aggregator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Override the root URL from the configuration
    #[arg(long)]
    url: Option<String>,

    /// Override the initial crawl depth from the configuration
    #[arg(long)]
    depth: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show statistics from the database and exit
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(url) = cli.url {
        config.crawler.root_url = url;
    }
    if let Some(depth) = cli.depth {
        config.crawler.depth = depth;
    }

    if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitefold=info,warn"),
            1 => EnvFilter::new("sitefold=debug,info"),
            2 => EnvFilter::new("sitefold=trace,debug"),
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

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &sitefold::config::Config) -> anyhow::Result<()> {
    use sitefold::storage::open_storage;
    use std::path::Path;

    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: sitefold::config::Config) -> anyhow::Result<()> {
    println!("Starting crawl...");
    tracing::info!(
        "Root: {}, depth: {}, target language: {}",
        config.crawler.root_url,
        config.crawler.depth,
        config.crawler.target_language
    );

    let report = crawl(config).await.context("Crawl failed")?;

    print_crawl_report(&report);

    Ok(())
}
