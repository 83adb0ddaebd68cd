//! Page loading and parsing
//!
//! The crawler only ever talks to a [`PageParser`]: given a URL it returns the
//! page's word counts and outbound links, or an error. [`HtmlPageParser`] is the
//! real implementation (HTTP or local files, under a fixed per-page timeout);
//! tests substitute in-memory parsers.

mod fetcher;
mod html;

pub use fetcher::{build_http_client, fetch_page, read_local_page, FetchedPage};
pub use html::parse_html;

use crate::config::Config;
use crate::pattern::PatternSet;
use crate::profiler::Profiled;
use crate::PageResult;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Words and links extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Occurrences of each (normalized) word on the page
    pub word_counts: HashMap<String, u64>,

    /// Absolute outbound links, in document order
    pub links: Vec<String>,
}

/// Loads a page and extracts its word counts and outbound links
#[async_trait]
pub trait PageParser: Send + Sync {
    async fn parse(&self, url: &str) -> PageResult<ParsedPage>;
}

#[async_trait]
impl<P: PageParser> PageParser for Profiled<P> {
    async fn parse(&self, url: &str) -> PageResult<ParsedPage> {
        self.profile_async("parse", |parser| parser.parse(url)).await
    }
}

/// Page parser for `http`, `https` and `file` URLs
///
/// Every page gets the same fixed timeout, independent of how much of the crawl
/// budget is left.
pub struct HtmlPageParser {
    client: Client,
    timeout: Duration,
    ignored_words: PatternSet,
}

impl HtmlPageParser {
    pub fn new(client: Client, timeout: Duration, ignored_words: PatternSet) -> Self {
        Self {
            client,
            timeout,
            ignored_words,
        }
    }

    /// Builds a parser from a validated configuration
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        let ignored_words = PatternSet::compile(&config.crawler.ignored_words)?;
        Ok(Self::new(
            client,
            Duration::from_secs(config.page_timeout_seconds()),
            ignored_words,
        ))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl PageParser for HtmlPageParser {
    async fn parse(&self, url: &str) -> PageResult<ParsedPage> {
        let parsed_url = Url::parse(url).map_err(|e| crate::PageError::InvalidUrl {
            url: url.to_string(),
            source: e,
        })?;

        let page = match parsed_url.scheme() {
            "http" | "https" => fetch_page(&self.client, &parsed_url, self.timeout).await?,
            "file" => read_local_page(&parsed_url, self.timeout).await?,
            other => return Err(crate::PageError::UnsupportedScheme(other.to_string())),
        };

        tracing::trace!("Parsing {} ({} bytes)", page.final_url, page.body.len());
        Ok(parse_html(&page.body, &page.final_url, &self.ignored_words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::Profiler;
    use crate::PageError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_parser(ignored_words: &[&str]) -> HtmlPageParser {
        let sources: Vec<String> = ignored_words.iter().map(|s| s.to_string()).collect();
        HtmlPageParser::new(
            Client::new(),
            Duration::from_secs(5),
            PatternSet::compile(&sources).unwrap(),
        )
    }

    fn create_temp_page(html: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(html.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_parse_local_file() {
        let file = create_temp_page(
            r#"<html><body><p>The quick fox and the dog</p><a href="other.html">x</a></body></html>"#,
        );
        let url = Url::from_file_path(file.path()).unwrap();

        let parser = create_test_parser(&["and"]);
        let page = parser.parse(url.as_str()).await.unwrap();

        assert_eq!(page.word_counts.get("the"), Some(&2));
        assert_eq!(page.word_counts.get("and"), None);
        assert_eq!(page.links.len(), 1);
        assert!(page.links[0].starts_with("file://"));
        assert!(page.links[0].ends_with("/other.html"));
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let parser = create_test_parser(&[]);
        let result = parser.parse("file:///nonexistent/page.html").await;
        assert!(matches!(result, Err(PageError::Io { .. })));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let parser = create_test_parser(&[]);
        let result = parser.parse("not a url").await;
        assert!(matches!(result, Err(PageError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let parser = create_test_parser(&[]);
        let result = parser.parse("ftp://example.com/file").await;
        assert!(matches!(result, Err(PageError::UnsupportedScheme(s)) if s == "ftp"));
    }

    #[tokio::test]
    async fn test_profiled_parser_records_parse() {
        let file = create_temp_page("<html><body>hello</body></html>");
        let url = Url::from_file_path(file.path()).unwrap();

        let profiler = Profiler::new();
        let parser = profiler.wrap(create_test_parser(&[]));

        let page = parser.parse(url.as_str()).await.unwrap();
        assert_eq!(page.word_counts.get("hello"), Some(&1));

        // Failures are recorded too, and come back as the parser's own error
        let result = parser.parse("file:///nonexistent/page.html").await;
        assert!(matches!(result, Err(PageError::Io { .. })));

        let entry = profiler
            .state()
            .get_for::<HtmlPageParser>("parse")
            .unwrap();
        assert_eq!(entry.calls, 2);
    }
}
