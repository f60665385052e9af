//! Page fetching with a fixed politeness policy.
//!
//! Every request is preceded by a pause of `base + U(0, jitter)` seconds,
//! carries a static browser-like header set and is cut off after a fixed
//! timeout. Responses that are not 2xx or do not declare an HTML content
//! type are rejected. There is no retry: one call, one request.

use crate::config::{RequestHeaders, ScraperConfig};
use crate::error::FetchError;
use crate::utils::truncate_for_log;
use rand::{Rng, rng};
use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, REFERER,
    USER_AGENT,
};
use scraper::Html;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

const HTML_MEDIA_TYPE: &str = "text/html";

/// Pause applied before every outbound request.
///
/// This is a throttle, not a backoff: the same range is used regardless
/// of how earlier requests went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolitenessDelay {
    pub base: Duration,
    pub jitter: Duration,
}

impl PolitenessDelay {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// Base delay plus a uniformly drawn extra in `0..=jitter`.
    pub fn next_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }
        let extra: f64 = rng().random_range(0.0..=self.jitter.as_secs_f64());
        let extra = Duration::try_from_secs_f64(extra)
            .unwrap_or(self.jitter)
            .min(self.jitter);
        self.base.saturating_add(extra)
    }
}

/// One-shot HTML fetcher.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    delay: PolitenessDelay,
    listing_url: String,
}

impl Fetcher {
    /// Build a fetcher whose client carries the configured headers and timeout.
    ///
    /// Fails without panicking when the delay settings cannot be expressed
    /// as durations, even if `config` was never validated.
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let (base, jitter) = config.politeness_delays()?;
        let client = Client::builder()
            .default_headers(header_map(&config.headers)?)
            .timeout(config.timeout())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            delay: PolitenessDelay::new(base, jitter),
            listing_url: config.listing_url(),
        })
    }

    /// Fetch the configured listing page.
    pub async fn fetch_listing(&self) -> Result<Html, FetchError> {
        self.fetch(&self.listing_url).await
    }

    /// Wait out the politeness delay, GET `url` and parse the HTML body.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL of the page to fetch
    ///
    /// # Returns
    ///
    /// The parsed document, or a [`FetchError`] when the request fails,
    /// times out, returns a non-2xx status or does not declare
    /// `text/html` as its content type. No retry is attempted.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Html, FetchError> {
        let pause = self.delay.next_delay();
        debug!(?pause, "Sleeping before request");
        sleep(pause).await;

        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains(HTML_MEDIA_TYPE) {
            warn!(%content_type, "Response is not HTML");
            return Err(FetchError::ContentType {
                content_type,
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        info!(
            %status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        debug!(preview = %truncate_for_log(&body, 200), "Body preview");

        Ok(Html::parse_document(&body))
    }
}

fn header_map(headers: &RequestHeaders) -> Result<HeaderMap, FetchError> {
    let entries: [(HeaderName, &'static str, &str); 4] = [
        (USER_AGENT, "User-Agent", &headers.user_agent),
        (ACCEPT_LANGUAGE, "Accept-Language", &headers.accept_language),
        (ACCEPT, "Accept", &headers.accept),
        (REFERER, "Referer", &headers.referer),
    ];

    let mut map = HeaderMap::new();
    for (name, label, value) in entries {
        let value = HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
            name: label,
            reason: e.to_string(),
        })?;
        map.insert(name, value);
    }
    Ok(map)
}
