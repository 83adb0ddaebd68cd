use serde::Deserialize;

/// Main configuration structure for Tally-Crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl traversal configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URLs the crawl starts from
    #[serde(rename = "start-pages")]
    pub start_pages: Vec<String>,

    /// Maximum link depth; seeds are visited at depth 1
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Crawl-wide time budget in seconds
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,

    /// Number of most popular words to report
    #[serde(rename = "popular-word-count")]
    pub popular_word_count: usize,

    /// Desired number of crawl worker threads
    pub parallelism: usize,

    /// Regular expressions for URLs that must never be fetched
    #[serde(rename = "ignored-urls", default)]
    pub ignored_urls: Vec<String>,

    /// Regular expressions for words that must not be counted
    #[serde(rename = "ignored-words", default)]
    pub ignored_words: Vec<String>,
}

/// Page parser configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParserConfig {
    /// Fixed per-page timeout in seconds (defaults to the crawl timeout)
    #[serde(rename = "page-timeout-seconds")]
    pub page_timeout_seconds: Option<u64>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write the JSON crawl result (stdout when absent)
    #[serde(rename = "result-path")]
    pub result_path: Option<String>,

    /// Where to append the profiling report (stdout when absent)
    #[serde(rename = "profile-output-path")]
    pub profile_output_path: Option<String>,
}

impl Config {
    /// Returns the fixed per-page timeout in seconds
    pub fn page_timeout_seconds(&self) -> u64 {
        self.parser
            .page_timeout_seconds
            .unwrap_or(self.crawler.timeout_seconds)
    }
}
