//! CNN listing page scraper.
//!
//! Scrapes the article cards on CNN's US section page
//! (`https://www.cnn.com/us`). Cards come in three container flavours
//! (`container__item`, `card`, `stack__item`) and have used two naming
//! schemes for headline and description over time; both are tried.
//!
//! Only the first listing page is read. Publish dates are not on the
//! listing cards, so every record carries the date placeholder.

use super::{ExtractionRules, FieldStrategies, extract};
use crate::config::ScraperConfig;
use crate::error::{FetchError, ParseError};
use crate::fetch::Fetcher;
use crate::models::ArticleRecord;
use scraper::Html;
use tracing::{info, instrument};

/// Container classes used on the listing page.
pub const CONTAINER_MARKERS: [&str; 3] = ["container__item", "card", "stack__item"];

const TITLE_SELECTORS: [&str; 2] = [
    "span.container__headline-text, h3.container__headline-text",
    "span.headline__text, h3.headline__text",
];
const LINK_SELECTORS: [&str; 1] = ["a[href]"];
const SUMMARY_SELECTORS: [&str; 2] = ["div.container__description", "div.headline__sub-text"];

/// Extraction rules for CNN's current card markup.
pub fn rules() -> Result<ExtractionRules, ParseError> {
    Ok(ExtractionRules {
        containers: ExtractionRules::div_containers(&CONTAINER_MARKERS)?,
        title: FieldStrategies::css(&TITLE_SELECTORS)?,
        link: FieldStrategies::css(&LINK_SELECTORS)?,
        summary: FieldStrategies::css(&SUMMARY_SELECTORS)?,
    })
}

/// Extract article records from an already fetched listing page.
pub fn scrape_document(
    document: &Html,
    rules: &ExtractionRules,
    config: &ScraperConfig,
) -> Vec<ArticleRecord> {
    extract(document, rules, &config.origin)
}

/// Fetch the listing page and extract its article cards.
///
/// # Arguments
///
/// * `fetcher` - Fetcher configured with the politeness delay and headers
/// * `rules` - CNN extraction rules, usually from [`rules`]
/// * `config` - Supplies the origin for link resolution
///
/// # Returns
///
/// The records of the single listing page, or the [`FetchError`] that
/// prevented reading it. Extraction itself cannot fail as a whole; bad
/// containers are skipped.
#[instrument(level = "info", skip_all, fields(url = %config.listing_url()))]
pub async fn scrape(
    fetcher: &Fetcher,
    rules: &ExtractionRules,
    config: &ScraperConfig,
) -> Result<Vec<ArticleRecord>, FetchError> {
    let document = fetcher.fetch_listing().await?;
    let records = scrape_document(&document, rules, config);
    info!(count = records.len(), "Scraped CNN listing page");
    Ok(records)
}
