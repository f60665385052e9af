//! Command-line interface definitions.
//!
//! Flags override values loaded from the optional YAML config file.

use crate::config::ScraperConfig;
use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Scrape the article cards of a news listing page into a CSV file.
///
/// # Examples
///
/// ```sh
/// # Defaults: https://www.cnn.com/us -> cnn_articles.csv
/// cnn_headlines
///
/// # Custom config and output
/// cnn_headlines -c scraper.yaml -o /tmp/articles.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "SCRAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output CSV file (overrides the config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Site origin to scrape (overrides the config file)
    #[arg(long, env = "SCRAPER_ORIGIN")]
    pub origin: Option<String>,

    /// Skip the politeness delay before the request
    #[arg(long)]
    pub no_delay: bool,
}

impl Cli {
    /// Load the config file (or defaults) and apply flag overrides.
    pub fn resolve_config(&self) -> Result<ScraperConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ScraperConfig::load(path)?,
            None => ScraperConfig::default(),
        };
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(origin) = &self.origin {
            config.set_origin(origin)?;
        }
        if self.no_delay {
            config.delay_base_secs = 0.0;
            config.delay_jitter_secs = 0.0;
        }
        config.validate()?;
        Ok(config)
    }
}
