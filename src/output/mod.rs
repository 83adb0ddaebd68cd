//! Output module for crawl results
//!
//! This module handles:
//! - Writing the JSON crawl result to a file or stdout
//! - Printing a short human-readable summary

use crate::crawler::CrawlResult;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes the crawl result as pretty-printed JSON
///
/// # Arguments
///
/// * `result` - The crawl result
/// * `path` - File to write (replacing any previous content), or `None` for stdout
pub fn write_result(result: &CrawlResult, path: Option<&Path>) -> OutputResult<()> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_result_to(result, &mut writer)
        }
        None => write_result_to(result, &mut io::stdout().lock()),
    }
}

/// Writes the crawl result as pretty-printed JSON to any writer
pub fn write_result_to<W: Write>(result: &CrawlResult, writer: &mut W) -> OutputResult<()> {
    serde_json::to_writer_pretty(&mut *writer, result)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Prints a summary of the crawl result to stdout
pub fn print_summary(result: &CrawlResult) {
    println!("=== Crawl Summary ===\n");
    println!("Pages visited: {}", result.urls_visited);
    println!();

    if result.word_counts.is_empty() {
        println!("No words counted.");
        return;
    }

    println!("Popular Words:");
    let total: u64 = result.word_counts.iter().map(|(_, count)| count).sum();
    for (rank, (word, count)) in result.word_counts.iter().enumerate() {
        let percentage = (*count as f64 / total as f64) * 100.0;
        println!("  {}. {}: {} ({:.1}% of listed)", rank + 1, word, count, percentage);
    }
}
