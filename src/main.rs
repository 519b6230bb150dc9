//! Site-Harvest main entry point
//!
//! This is the command-line interface for the Site-Harvest scraper.

use anyhow::{bail, Context};
use clap::Parser;
use site_harvest::config::{load_config_with_hash, Config, CrawlSettings};
use site_harvest::crawler::{Engine, HttpTransport, Transport};
use site_harvest::output::print_statistics;
use site_harvest::storage::FileStore;
use site_harvest::RunState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Site-Harvest: a single-domain web scraper
///
/// Site-Harvest crawls one site from its base URL, stores every page it
/// reaches, optionally downloads images, stylesheets and scripts, and writes
/// a JSON report of what it scraped.
#[derive(Parser, Debug)]
#[command(name = "site-harvest")]
#[command(version)]
#[command(about = "A single-domain web scraper", long_about = None)]
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

    /// Write the JSON report here, overriding the configured report path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(report) = &cli.report {
        config.output.report_path = Some(report.display().to_string());
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_harvest=info,warn"),
            1 => EnvFilter::new("site_harvest=debug,info"),
            2 => EnvFilter::new("site_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Site-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Recursive: {}", config.crawler.recursive);
    println!("  Request delay: {}s", config.crawler.request_delay);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Rendered fetch: {}", config.crawler.rendered_fetch);
    if let Some(webdriver) = &config.crawler.webdriver_url {
        println!("  WebDriver: {}", webdriver);
    }

    println!("\nFilters:");
    println!("  Skip e-shop pages: {}", config.filters.filter_eshop);
    println!("  Skip English pages: {}", config.filters.filter_english);
    for pattern in &config.filters.include_patterns {
        println!("  + {}", pattern);
    }
    for pattern in &config.filters.exclude_patterns {
        println!("  - {}", pattern);
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.output_dir);
    match &config.output.report_path {
        Some(report) => println!("  Report: {}", report),
        None => println!("  Report: (none)"),
    }

    println!("\nAssets:");
    println!("  Images: {}", config.assets.download_images);
    println!("  CSS: {}", config.assets.download_css);
    println!("  JS: {}", config.assets.download_js);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling from {}", config.crawler.base_url);
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let settings = CrawlSettings::from_config(config)?;
    tracing::info!(
        "Crawling {} (domain {}, recursive: {})",
        settings.base_url,
        settings.domain(),
        settings.recursive
    );

    let transport = Arc::new(HttpTransport::from_settings(&settings).await?);
    let store = Arc::new(FileStore::from_settings(&settings));
    let engine = Engine::new(settings, Arc::clone(&transport) as Arc<dyn Transport>, store);

    // Stop after the current page on Ctrl-C
    let stop = engine.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            stop.request_stop();
        }
    });

    let outcome = engine.run().await?;
    drop(engine);
    if let Ok(transport) = Arc::try_unwrap(transport) {
        transport.close().await;
    }

    println!();
    print_statistics(outcome.state, &outcome.stats, outcome.total_urls());
    if let Some(report) = &outcome.report_path {
        println!("\n✓ Report written to: {}", report.display());
    }

    if outcome.state == RunState::Failed {
        bail!(
            "Crawl failed: {}",
            outcome.failure.as_deref().unwrap_or("unknown cause")
        );
    }

    Ok(())
}
