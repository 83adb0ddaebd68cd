//! Call profiling for wrapped collaborators
//!
//! A [`Profiler`] owns one [`ProfilingState`] and hands out [`Profiled`] wrappers
//! that share it. Wrapping does not change what the target does: callers see the
//! same return values, the same errors, and the same panics. The profiler only
//! accumulates how long the profiled operations took, and renders a report on
//! demand.
//!
//! # Example
//!
//! ```no_run
//! use tally_crawl::page::{HtmlPageParser, PageParser};
//! use tally_crawl::profiler::Profiler;
//!
//! # fn example(parser: HtmlPageParser) -> Result<(), Box<dyn std::error::Error>> {
//! let profiler = Profiler::new();
//! let parser = profiler.wrap(parser);
//! // ... hand `parser` to the crawler ...
//! profiler.write_report(&mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

mod state;
mod wrapper;

pub use state::{ProfileEntry, ProfileKey, ProfilingState};
pub use wrapper::Profiled;

use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the profiling machinery itself
///
/// Errors from a wrapped target never appear here; they reach the caller untouched.
#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error("Failed to write profiling report: {0}")]
    Io(#[from] std::io::Error),
}

/// Creates profiled wrappers and reports on them
pub struct Profiler {
    state: Arc<ProfilingState>,
    started_at: DateTime<Utc>,
}

impl Profiler {
    /// Creates a profiler with an empty state
    pub fn new() -> Self {
        Self {
            state: Arc::new(ProfilingState::new()),
            started_at: Utc::now(),
        }
    }

    /// Wraps a target so its profiled operations are timed into this profiler's state
    pub fn wrap<T>(&self, target: T) -> Profiled<T> {
        Profiled::new(target, Arc::clone(&self.state))
    }

    /// Returns the accumulated state
    pub fn state(&self) -> &ProfilingState {
        &self.state
    }

    /// Writes a human-readable report of everything recorded so far
    ///
    /// The report starts with the time the profiler was created, lists one line
    /// per profiled operation, and ends with a blank line so that successive
    /// reports appended to one file stay readable.
    pub fn write_report<W: Write>(&self, writer: &mut W) -> Result<(), ProfilerError> {
        writeln!(writer, "Run at {}", self.started_at.to_rfc2822())?;
        self.state.write(writer)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Appends the report to a file, creating it if needed
    pub fn write_report_to_path(&self, path: &Path) -> Result<(), ProfilerError> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        self.write_report(&mut file)
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}
