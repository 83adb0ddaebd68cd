//! HTML parser for extracting words and links
//!
//! This module turns a page body into:
//! - Word counts over the visible body text
//! - Outbound links to follow (from `<a>` tags)

use crate::page::ParsedPage;
use crate::pattern::PatternSet;
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

/// Elements whose text is never counted
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Parses HTML content and extracts word counts and links
///
/// # Word Rules
///
/// - Only text inside `<body>` counts, excluding `script`, `style` and `noscript`
/// - Text is split on whitespace, lowercased, and stripped of non-word characters
/// - Empty results and words fully matching an ignored-word pattern are dropped
///
/// # Link Rules
///
/// **Include:** `<a href="...">` resolved against `base_url`, fragment removed
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links
/// - `file:` links, unless the page itself is a local file
///
/// # Example
///
/// ```
/// use tally_crawl::page::parse_html;
/// use tally_crawl::pattern::PatternSet;
/// use url::Url;
///
/// let html = r#"<html><body>Hello hello <a href="/page">world</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url, &PatternSet::default());
/// assert_eq!(parsed.word_counts["hello"], 2);
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url, ignored_words: &PatternSet) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        word_counts: count_words(&document, ignored_words),
        links: extract_links(&document, base_url),
    }
}

/// Counts words in the document body
fn count_words(document: &Html, ignored_words: &PatternSet) -> HashMap<String, u64> {
    let mut counts = HashMap::new();

    let Ok(body_selector) = Selector::parse("body") else {
        return counts;
    };

    for body in document.select(&body_selector) {
        for node in body.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };

            let skipped = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
            });
            if skipped {
                continue;
            }

            for raw in text.split_whitespace() {
                let word = normalize_word(raw);
                if word.is_empty() || ignored_words.matches(&word) {
                    continue;
                }
                *counts.entry(word).or_insert(0) += 1;
            }
        }
    }

    counts
}

/// Lowercases a word and drops every non-word character
fn normalize_word(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Extracts all followable links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Schemes the page parser cannot load from this page
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    // Skip empty hrefs
    if href.is_empty() {
        return None;
    }

    // Skip special schemes
    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    absolute_url.set_fragment(None);

    let allowed = match absolute_url.scheme() {
        "http" | "https" => true,
        "file" => base_url.scheme() == "file",
        _ => false,
    };

    allowed.then(|| absolute_url.to_string())
}
