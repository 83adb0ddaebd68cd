//! Crawler module for parallel page traversal
//!
//! This module contains the core crawling logic, including:
//! - The worker pool and per-crawl orchestration
//! - Recursive fork/join crawl tasks
//! - Shared visited-set and word-count state
//! - Result assembly

mod orchestrator;
mod result;
mod state;
mod task;

pub use orchestrator::{max_parallelism, CrawlOptions, ParallelCrawler};
pub use result::{top_words, CrawlResult};
pub use state::CrawlState;
