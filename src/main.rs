//! Tally-Crawl main entry point
//!
//! This is the command-line interface for the Tally-Crawl word-counting crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tally_crawl::config::{load_config_with_hash, Config};
use tally_crawl::crawler::{max_parallelism, CrawlOptions, ParallelCrawler};
use tally_crawl::output::{print_summary, write_result};
use tally_crawl::page::HtmlPageParser;
use tally_crawl::profiler::Profiler;
use tracing_subscriber::EnvFilter;

/// Tally-Crawl: a bounded, parallel word-counting crawler
///
/// Tally-Crawl follows links from a set of start pages up to a depth and time
/// budget, counts the words on every page it visits, and reports the most
/// popular ones.
#[derive(Parser, Debug)]
#[command(name = "tally-crawl")]
#[command(version)]
#[command(about = "A bounded, parallel word-counting crawler", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, cli.quiet)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tally_crawl=info,warn"),
            1 => EnvFilter::new("tally_crawl=debug,info"),
            2 => EnvFilter::new("tally_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Tally-Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Timeout: {}s", config.crawler.timeout_seconds);
    println!("  Page timeout: {}s", config.page_timeout_seconds());
    println!("  Popular word count: {}", config.crawler.popular_word_count);
    println!(
        "  Parallelism: {} (host allows {})",
        config.crawler.parallelism,
        max_parallelism()
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    if let Some(contact) = &config.user_agent.contact_url {
        println!("  Contact URL: {}", contact);
    }

    println!("\nStart Pages ({}):", config.crawler.start_pages.len());
    for page in &config.crawler.start_pages {
        println!("  - {}", page);
    }

    println!("\nIgnored URLs ({}):", config.crawler.ignored_urls.len());
    for pattern in &config.crawler.ignored_urls {
        println!("  - {}", pattern);
    }

    println!("\nIgnored Words ({}):", config.crawler.ignored_words.len());
    for pattern in &config.crawler.ignored_words {
        println!("  - {}", pattern);
    }

    println!("\nOutput:");
    println!(
        "  Result: {}",
        config.output.result_path.as_deref().unwrap_or("<stdout>")
    );
    println!(
        "  Profile: {}",
        config.output.profile_output_path.as_deref().unwrap_or("<stdout>")
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
fn handle_crawl(config: &Config, quiet: bool) -> anyhow::Result<()> {
    let profiler = Profiler::new();
    let parser = profiler.wrap(
        HtmlPageParser::from_config(config).context("Failed to build page parser")?,
    );
    let options = CrawlOptions::from_config(config)?;
    let crawler = ParallelCrawler::new(Arc::new(parser), options)?;

    tracing::info!(
        "Total start pages: {}, workers: {}",
        config.crawler.start_pages.len(),
        crawler.parallelism()
    );

    let result = crawler.crawl(&config.crawler.start_pages);

    let result_path = config.output.result_path.as_deref().map(Path::new);
    write_result(&result, result_path).context("Failed to write crawl result")?;
    if let Some(path) = result_path {
        tracing::info!("Result written to: {}", path.display());
        if !quiet {
            print_summary(&result);
        }
    }

    match config.output.profile_output_path.as_deref().map(Path::new) {
        Some(path) => {
            profiler
                .write_report_to_path(path)
                .with_context(|| format!("Failed to write profile to {}", path.display()))?;
            tracing::info!("Profile written to: {}", path.display());
        }
        None => profiler
            .write_report(&mut std::io::stdout().lock())
            .context("Failed to write profile")?,
    }

    Ok(())
}
