//! Article card extraction from listing pages.
//!
//! A listing page is scanned for container elements, one pass per
//! container marker, and each container is turned into an
//! [`ArticleRecord`] by trying an ordered list of strategies per field.
//! The first strategy that matches wins, which lets a rule set tolerate
//! markup drift by listing old and new class names side by side.
//!
//! # Sources
//!
//! | Source | Module | Listing page |
//! |--------|--------|--------------|
//! | CNN | [`cnn`] | `{origin}/us` |
//!
//! # Failure handling
//!
//! A container that lacks a title or link yields a [`ParseError`] which is
//! logged and skipped; it never aborts the rest of the page. Results keep
//! document order within a marker and marker order across markers, and
//! are not deduplicated.

pub mod cnn;

use crate::error::ParseError;
use crate::models::ArticleRecord;
use crate::utils::{element_text, resolve_link};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// One way of locating a field inside a container.
pub trait FieldSelector {
    /// First matching descendant of `container`, if any.
    fn select<'a>(&self, container: ElementRef<'a>) -> Option<ElementRef<'a>>;

    /// Human readable description for logs.
    fn describe(&self) -> &str;
}

/// Strategy backed by a CSS selector.
#[derive(Debug, Clone)]
pub struct CssStrategy {
    source: String,
    selector: Selector,
}

impl CssStrategy {
    pub fn new(css: &str) -> Result<Self, ParseError> {
        let selector = Selector::parse(css).map_err(|e| ParseError::InvalidSelector {
            selector: css.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: css.to_string(),
            selector,
        })
    }
}

impl FieldSelector for CssStrategy {
    fn select<'a>(&self, container: ElementRef<'a>) -> Option<ElementRef<'a>> {
        container.select(&self.selector).next()
    }

    fn describe(&self) -> &str {
        &self.source
    }
}

/// Ordered fallbacks for a single field.
#[derive(Default)]
pub struct FieldStrategies {
    strategies: Vec<Box<dyn FieldSelector>>,
}

impl FieldStrategies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy; earlier strategies take precedence.
    pub fn then(mut self, strategy: impl FieldSelector + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Build from CSS selectors, in priority order.
    pub fn css(selectors: &[&str]) -> Result<Self, ParseError> {
        selectors
            .iter()
            .try_fold(Self::new(), |acc, css| Ok(acc.then(CssStrategy::new(css)?)))
    }

    /// Result of the first strategy that matches.
    pub fn first_match<'a>(&self, container: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.strategies.iter().find_map(|s| s.select(container))
    }
}

impl std::fmt::Debug for FieldStrategies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.describe()))
            .finish()
    }
}

/// Where the fields of an article card live on a particular site.
#[derive(Debug)]
pub struct ExtractionRules {
    /// Container selectors, scanned one full pass each, in order.
    pub containers: Vec<(String, Selector)>,
    pub title: FieldStrategies,
    pub link: FieldStrategies,
    pub summary: FieldStrategies,
}

impl ExtractionRules {
    /// Compile container selectors for `div` elements carrying each class.
    pub fn div_containers(markers: &[&str]) -> Result<Vec<(String, Selector)>, ParseError> {
        markers
            .iter()
            .map(|marker| {
                let css = format!("div.{marker}");
                let selector = Selector::parse(&css).map_err(|e| ParseError::InvalidSelector {
                    selector: css.clone(),
                    reason: e.to_string(),
                })?;
                Ok((marker.to_string(), selector))
            })
            .collect()
    }
}

/// Turn one container into a record.
pub fn extract_card(
    container: ElementRef<'_>,
    rules: &ExtractionRules,
    origin: &Url,
) -> Result<ArticleRecord, ParseError> {
    let title_el = rules
        .title
        .first_match(container)
        .ok_or(ParseError::MissingTitle)?;
    let title = element_text(title_el);
    if title.is_empty() {
        return Err(ParseError::EmptyTitle);
    }

    let href = rules
        .link
        .first_match(container)
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or(ParseError::MissingLink)?;
    let url = resolve_link(origin, href);

    let summary = rules
        .summary
        .first_match(container)
        .map(element_text)
        .filter(|s| !s.is_empty());

    Ok(ArticleRecord::new(title, url, summary))
}

/// Extract every usable article card from `document`.
///
/// Each container marker is scanned over the whole document in turn and
/// the results are concatenated. Containers that fail [`extract_card`]
/// are logged and skipped.
///
/// # Arguments
///
/// * `document` - Parsed listing page
/// * `rules` - Container markers and per-field strategies for the site
/// * `origin` - Site origin used to absolutise path-only links
///
/// # Returns
///
/// Records in marker order, then document order. Duplicates are kept.
#[instrument(level = "info", skip_all, fields(%origin))]
pub fn extract(document: &Html, rules: &ExtractionRules, origin: &Url) -> Vec<ArticleRecord> {
    let mut records = Vec::new();

    for (marker, selector) in &rules.containers {
        let mut matched = 0usize;
        let mut kept = 0usize;
        for container in document.select(selector) {
            matched += 1;
            match extract_card(container, rules, origin) {
                Ok(record) => {
                    kept += 1;
                    records.push(record);
                }
                Err(e @ (ParseError::MissingTitle | ParseError::MissingLink)) => {
                    debug!(%marker, error = %e, "Skipping container");
                }
                Err(e) => {
                    warn!(%marker, error = %e, "Error parsing article container");
                }
            }
        }
        debug!(%marker, matched, kept, "Scanned container marker");
    }

    info!(count = records.len(), "Extracted article records");
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ExtractionRules {
        ExtractionRules {
            containers: ExtractionRules::div_containers(&["item", "alt"]).unwrap(),
            title: FieldStrategies::css(&["h3.new-title", "h2.old-title"]).unwrap(),
            link: FieldStrategies::css(&["a[href]"]).unwrap(),
            summary: FieldStrategies::css(&["p.blurb"]).unwrap(),
        }
    }

    fn origin() -> Url {
        Url::parse("https://news.example").unwrap()
    }

    fn first_item(doc: &Html) -> ElementRef<'_> {
        let sel = Selector::parse("div.item").unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn test_first_strategy_wins() {
        let doc = Html::parse_document(
            r#"<div class="item">
                <h2 class="old-title">Old</h2>
                <h3 class="new-title">New</h3>
                <a href="/a">x</a>
            </div>"#,
        );
        let record = extract_card(first_item(&doc), &rules(), &origin()).unwrap();
        assert_eq!(record.title, "New");
        assert_eq!(record.url, "https://news.example/a");
    }

    #[test]
    fn test_fallback_strategy_used() {
        let doc = Html::parse_document(
            r#"<div class="item"><h2 class="old-title">Old</h2><a href="/a">x</a></div>"#,
        );
        let record = extract_card(first_item(&doc), &rules(), &origin()).unwrap();
        assert_eq!(record.title, "Old");
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let doc = Html::parse_document(
            r#"<div class="item"><h3 class="new-title">   </h3><a href="/a">x</a></div>"#,
        );
        let err = extract_card(first_item(&doc), &rules(), &origin()).unwrap_err();
        assert_eq!(err, ParseError::EmptyTitle);
    }

    #[test]
    fn test_empty_href_is_missing_link() {
        let doc = Html::parse_document(
            r#"<div class="item"><h3 class="new-title">T</h3><a href="">x</a></div>"#,
        );
        let err = extract_card(first_item(&doc), &rules(), &origin()).unwrap_err();
        assert_eq!(err, ParseError::MissingLink);
    }

    #[test]
    fn test_invalid_selector_reported() {
        let err = CssStrategy::new("div[").unwrap_err();
        assert!(matches!(err, ParseError::InvalidSelector { .. }));
    }

    #[test]
    fn test_markers_scanned_in_order_without_dedup() {
        let doc = Html::parse_document(
            r#"<body>
                <div class="alt"><h3 class="new-title">Second</h3><a href="/s">s</a></div>
                <div class="item alt"><h3 class="new-title">Both</h3><a href="/b">b</a></div>
                <div class="item"><h3 class="new-title">First</h3><a href="/f">f</a></div>
            </body>"#,
        );
        let titles: Vec<_> = extract(&doc, &rules(), &origin())
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Both", "First", "Second", "Both"]);
    }

    #[test]
    fn test_strategies_debug_lists_selectors() {
        let strategies = FieldStrategies::css(&["a", "b"]).unwrap();
        assert_eq!(format!("{strategies:?}"), r#"["a", "b"]"#);
    }
}
