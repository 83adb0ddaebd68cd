//! Configuration module for Tally-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Malformed configuration is always a startup failure; nothing here runs once a
//! crawl has begun.
//!
//! # Example
//!
//! ```no_run
//! use tally_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, ParserConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
