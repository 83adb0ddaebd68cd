//! Accumulated profiling data
//!
//! Every profiled call adds its elapsed time to the entry keyed by the wrapped
//! type and operation name. Entries are never reset; a report is a snapshot.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

/// Identifies a profiled operation on a concrete target type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileKey {
    /// Fully qualified type name of the wrapped target
    pub target: &'static str,

    /// Name of the profiled operation
    pub operation: &'static str,
}

/// Cumulative timing for one profiled operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileEntry {
    /// Total wall-clock time spent in the operation
    pub total: Duration,

    /// Number of completed calls, successful or not
    pub calls: u64,
}

/// Thread-safe accumulator shared by every wrapper created from one profiler
#[derive(Debug, Default)]
pub struct ProfilingState {
    entries: DashMap<ProfileKey, ProfileEntry>,
}

impl ProfilingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one call's elapsed time to the running total for `(target, operation)`
    pub fn record(&self, target: &'static str, operation: &'static str, elapsed: Duration) {
        let mut entry = self
            .entries
            .entry(ProfileKey { target, operation })
            .or_default();
        entry.total += elapsed;
        entry.calls += 1;
    }

    /// Returns the accumulated entry for `(target, operation)`, if any call was recorded
    pub fn get(&self, target: &'static str, operation: &'static str) -> Option<ProfileEntry> {
        self.entries
            .get(&ProfileKey { target, operation })
            .map(|entry| *entry)
    }

    /// Returns the accumulated entry for an operation on type `T`
    pub fn get_for<T: ?Sized>(&self, operation: &'static str) -> Option<ProfileEntry> {
        self.get(std::any::type_name::<T>(), operation)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies the current entries into a map ordered by key
    pub fn snapshot(&self) -> BTreeMap<ProfileKey, ProfileEntry> {
        self.entries
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }

    /// Writes one line per profiled operation, ordered by type then operation
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (key, entry) in self.snapshot() {
            writeln!(
                writer,
                "{}#{} took {} ({} calls)",
                key.target,
                key.operation,
                format_duration(entry.total),
                entry.calls
            )?;
        }
        Ok(())
    }
}

/// Formats a duration as minutes, seconds and milliseconds
fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    format!(
        "{}m {}s {}ms",
        total_ms / 60_000,
        (total_ms / 1_000) % 60,
        total_ms % 1_000
    )
}
