//! Helpers for text cleanup, link resolution and logging.

use scraper::ElementRef;
use url::Url;

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (backing off to a char boundary)
/// with an ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Visible text of an element.
///
/// Each text node is trimmed, blank nodes are dropped and the rest are
/// joined with a single space. Stripped nodes are not glued together, so
/// `Breaking:<b>storm</b>` reads `Breaking: storm`, not `Breaking:storm`.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn a card link into an absolute URL.
///
/// Path-absolute links (`/politics/story`) get the origin prefixed,
/// scheme-relative links (`//host/path`) get the origin's scheme, and
/// anything else is returned unchanged.
pub fn resolve_link(origin: &Url, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("//") {
        if let Ok(resolved) = origin.join(href) {
            return resolved.to_string();
        }
        return href.to_string();
    }
    if href.starts_with('/') {
        return format!("{}{}", origin.as_str().trim_end_matches('/'), href);
    }
    href.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn cnn() -> Url {
        Url::parse("https://www.cnn.com").unwrap()
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let result = truncate_for_log("ééé", 3);
        assert_eq!(result, "é…(+4 bytes)");
    }

    #[test]
    fn test_resolve_path_absolute_link() {
        assert_eq!(
            resolve_link(&cnn(), "/politics/story-1"),
            "https://www.cnn.com/politics/story-1"
        );
    }

    #[test]
    fn test_resolve_absolute_link_unchanged() {
        assert_eq!(
            resolve_link(&cnn(), "https://example.com/x"),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_resolve_scheme_relative_link() {
        assert_eq!(
            resolve_link(&cnn(), "//edition.cnn.com/world"),
            "https://edition.cnn.com/world"
        );
    }

    #[test]
    fn test_resolve_keeps_origin_port() {
        let origin = Url::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(resolve_link(&origin, "/us/a"), "http://127.0.0.1:8080/us/a");
    }

    #[test]
    fn test_element_text_joins_trimmed_nodes() {
        let html = Html::parse_fragment(
            "<span class=\"t\">\n  Breaking:\n <b>storm</b>   hits coast \n</span>",
        );
        let selector = Selector::parse("span.t").unwrap();
        let span = html.select(&selector).next().unwrap();
        assert_eq!(element_text(span), "Breaking: storm hits coast");
    }

    #[test]
    fn test_element_text_separates_adjacent_inline_nodes() {
        let html = Html::parse_fragment("<h3 class=\"t\">Breaking:<b>storm</b></h3>");
        let selector = Selector::parse("h3.t").unwrap();
        let h3 = html.select(&selector).next().unwrap();
        assert_eq!(element_text(h3), "Breaking: storm");
    }
}
