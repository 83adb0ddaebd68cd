//! Tally-Crawl: a bounded, parallel word-counting web crawler
//!
//! This crate explores outbound links from a set of seed URLs up to a configured
//! depth and time budget, tallies word frequencies across every visited page, and
//! reports the most popular words together with the number of distinct pages visited.
//! Calls on any wrapped collaborator can be timed with the [`profiler`] module.

pub mod config;
pub mod crawler;
pub mod output;
pub mod page;
pub mod pattern;
pub mod profiler;

use thiserror::Error;

/// Main error type for Tally-Crawl operations
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page error: {0}")]
    Page(#[from] PageError),

    #[error("Profiler error: {0}")]
    Profiler(#[from] profiler::ProfilerError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to start crawl worker pool: {0}")]
    WorkerPool(std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Errors raised while fetching or parsing a single page
///
/// The crawler never lets these escape a crawl task: a failed page simply
/// contributes no words and no links.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Failed to parse URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Failed to read {url}: {source}")]
    Io {
        url: String,
        source: std::io::Error,
    },
}

/// Result type alias for Tally-Crawl operations
pub type Result<T> = std::result::Result<T, TallyError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for page parsing operations
pub type PageResult<T> = std::result::Result<T, PageError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOptions, CrawlResult, ParallelCrawler};
pub use page::{HtmlPageParser, PageParser, ParsedPage};
pub use pattern::PatternSet;
pub use profiler::{Profiled, Profiler, ProfilingState};
