//! Scraper configuration.
//!
//! All knobs the fetcher and writer need live in [`ScraperConfig`]. The
//! defaults target CNN's US listing page; any field can be overridden
//! from a YAML file and a few from the command line.
//!
//! # Example
//!
//! ```yaml
//! origin: https://www.cnn.com
//! listing_path: /us
//! output_path: cnn_articles.csv
//! delay_base_secs: 5.0
//! delay_jitter_secs: 2.0
//! timeout_secs: 10
//! headers:
//!   referer: https://www.google.com/
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_ORIGIN: &str = "https://www.cnn.com";
pub const DEFAULT_LISTING_PATH: &str = "/us";
pub const DEFAULT_OUTPUT_PATH: &str = "cnn_articles.csv";
pub const DEFAULT_MAX_PAGES: u32 = 3;
pub const DEFAULT_DELAY_BASE_SECS: f64 = 5.0;
pub const DEFAULT_DELAY_JITTER_SECS: f64 = 2.0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const DEFAULT_REFERER: &str = "https://www.google.com/";

/// Static header set sent with every request.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RequestHeaders {
    pub user_agent: String,
    pub accept_language: String,
    pub accept: String,
    pub referer: String,
}

impl Default for RequestHeaders {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}

/// Everything one scrape run needs to know.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site origin; page requests and relative links are resolved against it.
    pub origin: Url,
    /// Path of the listing page, appended to `origin`.
    pub listing_path: String,
    /// Destination CSV file.
    pub output_path: PathBuf,
    /// Declared page limit. Only the first page is ever scraped.
    pub max_pages: u32,
    pub delay_base_secs: f64,
    pub delay_jitter_secs: f64,
    pub timeout_secs: u64,
    pub headers: RequestHeaders,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
            listing_path: DEFAULT_LISTING_PATH.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            max_pages: DEFAULT_MAX_PAGES,
            delay_base_secs: DEFAULT_DELAY_BASE_SECS,
            delay_jitter_secs: DEFAULT_DELAY_JITTER_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            headers: RequestHeaders::default(),
        }
    }
}

impl ScraperConfig {
    /// Load a YAML config file. Missing fields keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })?;
        debug!(?config, "Loaded scraper configuration");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Replace the origin with a user supplied one.
    pub fn set_origin(&mut self, value: &str) -> Result<(), ConfigError> {
        self.origin = Url::parse(value).map_err(|source| ConfigError::Url {
            value: value.to_string(),
            source,
        })?;
        Ok(())
    }

    /// Reject settings the fetcher cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.origin.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "origin must be http or https, got {}",
                self.origin
            )));
        }
        self.politeness_delays()?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    /// Origin as a string without the trailing slash `Url` always adds.
    pub fn origin_str(&self) -> &str {
        self.origin.as_str().trim_end_matches('/')
    }

    /// `{origin}{listing_path}`, e.g. `https://www.cnn.com/us`.
    pub fn listing_url(&self) -> String {
        let path = self.listing_path.trim_start_matches('/');
        format!("{}/{}", self.origin_str(), path)
    }

    /// Base and jitter of the politeness delay.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if either value is negative, not finite,
    /// too large for a [`Duration`], or if their sum overflows.
    pub fn politeness_delays(&self) -> Result<(Duration, Duration), ConfigError> {
        let to_duration = |name: &str, secs: f64| {
            Duration::try_from_secs_f64(secs).map_err(|e| {
                ConfigError::Invalid(format!("{name} must be a non-negative number of seconds, got {secs}: {e}"))
            })
        };
        let base = to_duration("delay_base_secs", self.delay_base_secs)?;
        let jitter = to_duration("delay_jitter_secs", self.delay_jitter_secs)?;
        if base.checked_add(jitter).is_none() {
            return Err(ConfigError::Invalid(format!(
                "delay_base_secs + delay_jitter_secs is too large ({} + {})",
                self.delay_base_secs, self.delay_jitter_secs
            )));
        }
        Ok((base, jitter))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
