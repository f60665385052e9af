//! Data model for scraped article cards.
//!
//! One [`ArticleRecord`] is produced per usable container on the listing
//! page. Records carry no identity beyond their position in the output;
//! the same story appearing in two containers yields two records.

/// Placeholder used when a card has no summary element.
pub const NO_SUMMARY: &str = "No summary available";

/// Placeholder for the publish date. Listing cards do not carry one and
/// reading it would need a second request per article.
pub const DATE_NOT_AVAILABLE: &str = "N/A";

/// Column header of the CSV output, in field order.
pub const CSV_HEADER: [&str; 4] = ["title", "summary", "url", "date"];

/// A single article card pulled from the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Headline text. Never empty.
    pub title: String,
    /// Card description, or [`NO_SUMMARY`].
    pub summary: String,
    /// Absolute article URL.
    pub url: String,
    /// Always [`DATE_NOT_AVAILABLE`] for now.
    pub date: String,
}

impl ArticleRecord {
    /// Build a record, substituting the placeholders for missing fields.
    pub fn new(title: String, url: String, summary: Option<String>) -> Self {
        Self {
            title,
            summary: summary.unwrap_or_else(|| NO_SUMMARY.to_string()),
            url,
            date: DATE_NOT_AVAILABLE.to_string(),
        }
    }

    /// Field values in [`CSV_HEADER`] order.
    pub fn as_row(&self) -> [&str; 4] {
        [
            self.title.as_str(),
            self.summary.as_str(),
            self.url.as_str(),
            self.date.as_str(),
        ]
    }
}
