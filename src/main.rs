//! # CNN Headlines
//!
//! Fetches a news listing page, pulls the article cards out of its HTML
//! and saves them as CSV rows (`title,summary,url,date`).
//!
//! ## Usage
//!
//! ```sh
//! cnn_headlines -o cnn_articles.csv
//! ```
//!
//! ## Pipeline
//!
//! One sequential pass, no retries:
//! 1. **Fetch**: wait out the politeness delay, GET `{origin}/us`, require HTML
//! 2. **Extract**: scan the known container classes and build records
//! 3. **Write**: save the records to the output CSV
//!
//! Fetch and write failures are logged; the process still exits normally.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod utils;

#[cfg(test)]
mod test_support;

use cli::Cli;
use config::ScraperConfig;
use fetch::Fetcher;
use outputs::csv::write_records;
use scrapers::{ExtractionRules, cnn};

/// How a run ended, as far as the user is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
    Saved(usize),
    NoArticles,
    WriteFailed,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("Starting CNN news scraping");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = args.resolve_config()?;
    if config.max_pages > 1 {
        info!(
            max_pages = config.max_pages,
            "Pagination is not supported; scraping the first page only"
        );
    }

    let rules = cnn::rules()?;
    let outcome = run(&config, &rules).await;

    let elapsed = start_time.elapsed();
    info!(?outcome, ?elapsed, "Execution complete");
    Ok(())
}

/// Fetch, extract and write once.
#[instrument(level = "info", skip_all, fields(output = %config.output_path.display()))]
async fn run(config: &ScraperConfig, rules: &ExtractionRules) -> RunOutcome {
    let records = match Fetcher::new(config) {
        Ok(fetcher) => match cnn::scrape(&fetcher, rules, config).await {
            Ok(records) => records,
            Err(e) if e.is_content_type() => {
                error!(url = %config.listing_url(), error = %e, "Unexpected content type");
                Vec::new()
            }
            Err(e) => {
                error!(url = %config.listing_url(), error = %e, "Error fetching listing page");
                Vec::new()
            }
        },
        Err(e) => {
            error!(error = %e, "Failed to set up HTTP client");
            Vec::new()
        }
    };

    if records.is_empty() {
        warn!("No articles found. CNN's structure may have changed.");
        return RunOutcome::NoArticles;
    }

    match write_records(&records, &config.output_path) {
        Ok(count) => {
            info!(count, path = %config.output_path.display(), "Scraped articles");
            RunOutcome::Saved(count)
        }
        Err(e) => {
            error!(error = %e, "Error saving CSV");
            RunOutcome::WriteFailed
        }
    }
}
