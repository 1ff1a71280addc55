//! Small helpers shared by the sessions and the extractors.
//!
//! - Text normalization for scraped element content
//! - Link lookup by visible text, in document order
//! - Log-friendly truncation of long markup

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Collapse runs of whitespace to a single space and trim the ends.
pub fn normalize_text(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

/// Visible text of an element, normalized with [`normalize_text`].
pub fn element_text(element: &ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}

/// How a link's visible text is compared with the wanted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMatch {
    Exact,
    Partial,
}

impl LinkMatch {
    pub fn matches(self, visible: &str, text: &str) -> bool {
        match self {
            LinkMatch::Exact => visible == text,
            LinkMatch::Partial => visible.contains(text),
        }
    }
}

/// `href` of the first `<a>` in document order whose text matches `text`.
///
/// Anchors without an `href` are skipped, so a matching anchor later in the
/// document can still win.
pub fn find_link_href(html: &str, text: &str, mode: LinkMatch) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter(|a| mode.matches(&element_text(a), text))
        .find_map(|a| a.value().attr("href").map(str::to_string))
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backing off to a char boundary)
/// with an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}
