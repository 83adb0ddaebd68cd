//! Parallel crawl orchestration
//!
//! The [`ParallelCrawler`] owns a fixed-size pool of worker threads (a tokio
//! multi-threaded runtime, which schedules tasks by work stealing). A crawl
//! submits one root task per start page to that pool and blocks until the whole
//! task tree has finished, then reads the totals out of the shared state.

use crate::config::Config;
use crate::crawler::result::CrawlResult;
use crate::crawler::state::CrawlState;
use crate::crawler::task::{CrawlContext, CrawlTask};
use crate::page::PageParser;
use crate::pattern::PatternSet;
use crate::{ConfigResult, TallyError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinSet;

/// Settings fixed for the lifetime of a crawler
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Crawl-wide time budget, measured from the start of each `crawl` call
    pub timeout: Duration,

    /// Link depth budget; start pages are visited with the full budget
    pub max_depth: u32,

    /// Number of words reported in the result
    pub popular_word_count: usize,

    /// Desired number of worker threads
    pub parallelism: usize,

    /// URLs that must never be fetched
    pub ignored_urls: PatternSet,
}

impl CrawlOptions {
    /// Builds crawl options from a validated configuration
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Ok(Self {
            timeout: Duration::from_secs(config.crawler.timeout_seconds),
            max_depth: config.crawler.max_depth,
            popular_word_count: config.crawler.popular_word_count,
            parallelism: config.crawler.parallelism,
            ignored_urls: PatternSet::compile(&config.crawler.ignored_urls)?,
        })
    }
}

/// Returns the parallelism reported by the host, at least 1
pub fn max_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// A crawler that runs page loads in parallel on its own worker pool
pub struct ParallelCrawler {
    pool: Runtime,
    parser: Arc<dyn PageParser>,
    ignored_urls: Arc<PatternSet>,
    timeout: Duration,
    max_depth: u32,
    popular_word_count: usize,
    workers: usize,
}

impl ParallelCrawler {
    /// Creates a crawler and starts its worker pool
    ///
    /// The pool gets `min(options.parallelism, max_parallelism())` workers, and
    /// never fewer than one.
    ///
    /// # Arguments
    ///
    /// * `parser` - The page parser every task loads pages through
    /// * `options` - Crawl budget and reporting settings
    ///
    /// # Returns
    ///
    /// * `Ok(ParallelCrawler)` - Ready to crawl
    /// * `Err(TallyError::WorkerPool)` - The worker threads could not be started
    pub fn new(parser: Arc<dyn PageParser>, options: CrawlOptions) -> crate::Result<Self> {
        let workers = options.parallelism.min(max_parallelism()).max(1);

        let pool = Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("crawl-worker")
            .enable_all()
            .build()
            .map_err(TallyError::WorkerPool)?;

        Ok(Self {
            pool,
            parser,
            ignored_urls: Arc::new(options.ignored_urls),
            timeout: options.timeout,
            max_depth: options.max_depth,
            popular_word_count: options.popular_word_count,
            workers,
        })
    }

    /// Number of worker threads actually in use
    pub fn parallelism(&self) -> usize {
        self.workers
    }

    /// Crawls from the given start pages and blocks until the crawl is finished
    ///
    /// Page failures never fail the crawl; they only mean fewer words and links.
    /// Must not be called from inside another tokio runtime.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use tally_crawl::config::load_config;
    /// use tally_crawl::{CrawlOptions, HtmlPageParser, ParallelCrawler};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = load_config(std::path::Path::new("config.toml"))?;
    /// let parser = Arc::new(HtmlPageParser::from_config(&config)?);
    /// let crawler = ParallelCrawler::new(parser, CrawlOptions::from_config(&config)?)?;
    /// let result = crawler.crawl(&config.crawler.start_pages);
    /// println!("{} pages visited", result.urls_visited);
    /// # Ok(())
    /// # }
    /// ```
    pub fn crawl(&self, start_pages: &[String]) -> CrawlResult {
        let started = Instant::now();
        let context = Arc::new(CrawlContext {
            parser: Arc::clone(&self.parser),
            ignored_urls: Arc::clone(&self.ignored_urls),
            deadline: started + self.timeout,
            state: CrawlState::new(),
        });

        tracing::info!(
            "Starting crawl of {} start pages (max depth {}, timeout {:?}, {} workers)",
            start_pages.len(),
            self.max_depth,
            self.timeout,
            self.workers
        );

        self.pool.block_on(async {
            let mut roots = JoinSet::new();
            for url in start_pages {
                let root = CrawlTask::new(url.clone(), self.max_depth, Arc::clone(&context));
                roots.spawn(root.run());
            }

            while let Some(joined) = roots.join_next().await {
                if let Err(e) = joined {
                    tracing::warn!("Root crawl task failed: {}", e);
                }
            }
        });

        let state = &context.state;
        let result = CrawlResult::new(
            state.word_counts(),
            self.popular_word_count,
            state.visited_count(),
        );

        tracing::info!(
            "Crawl finished: {} pages visited in {:?}",
            result.urls_visited,
            started.elapsed()
        );

        result
    }
}
