//! Fauna-Watch main entry point
//!
//! This is the command-line interface for the forum thread watcher.

use clap::Parser;
use fauna_watch::config::load_config;
use fauna_watch::crawler::{build_http_client, walk};
use fauna_watch::digest::format_console_listing;
use fauna_watch::handler::{run_digest, Trigger};
use fauna_watch::record::save_records;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Fauna-Watch: a forum thread watcher and digest mailer
///
/// Crawls a classifieds forum's thread listing, filters threads by
/// keyword, and either prints the findings or emails an HTML digest.
#[derive(Parser, Debug)]
#[command(name = "fauna-watch")]
#[command(version = "1.0.0")]
#[command(about = "Forum thread watcher and digest mailer", long_about = None)]
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

    /// Also save the raw records to the configured JSON file
    #[arg(long, conflicts_with_all = ["digest", "dry_run"])]
    save: bool,

    /// Filter by keywords and email the digest instead of printing
    #[arg(long, conflicts_with = "dry_run")]
    digest: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        Ok(())
    } else if cli.digest {
        handle_digest(&config).await
    } else {
        handle_interactive(&config, cli.save).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("fauna_watch=info,warn"),
            1 => EnvFilter::new("fauna_watch=debug,info"),
            2 => EnvFilter::new("fauna_watch=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the plan
fn handle_dry_run(config: &fauna_watch::Config) {
    println!("=== Fauna-Watch Dry Run ===\n");

    println!("Forum:");
    println!("  Listing URL: {}", config.forum.listing_url());
    println!("  Pages: {}", config.forum.page_count);
    println!("  Page delay: {}ms", config.forum.page_delay_ms);

    println!("\nFetch:");
    println!("  Mode: {:?}", config.fetch.mode);
    println!("  User agent: {}", config.fetch.user_agent);
    if config.fetch.mode == fauna_watch::config::FetchMode::Proxy {
        println!("  Proxy endpoint: {}", config.fetch.proxy_endpoint);
        println!("  Proxy zone: {}", config.fetch.proxy_zone);
    }

    println!("\nEmail:");
    println!("  Recipient: {}", config.email.recipient);
    println!("  Subject: {}", config.email.subject);

    println!("\nOutput:");
    println!("  Keywords: {}", config.output.keywords_path);
    println!("  Records: {}", config.output.records_path);

    println!("\nRuntime:");
    println!("  Environment: {:?}", config.runtime.environment);

    println!("\n✓ Configuration is valid");
}

/// Handles the interactive mode: walk, print, optionally save
async fn handle_interactive(
    config: &fauna_watch::Config,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_http_client(&config.fetch)?;
    let records = walk(&client, config).await;

    print!("{}", format_console_listing(&records));

    if save {
        save_records(&records, Path::new(&config.output.records_path))?;
    }

    Ok(())
}

/// Handles the --digest mode: run the triggered pipeline
async fn handle_digest(config: &fauna_watch::Config) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = run_digest(config, Trigger::default()).await;
    println!("{}", serde_json::to_string(&outcome)?);

    if !outcome.is_success() {
        return Err(outcome.body.into());
    }
    Ok(())
}
