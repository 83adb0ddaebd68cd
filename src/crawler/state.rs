//! Shared state for one crawl
//!
//! Every task of a crawl holds the same `CrawlState`. Tasks only ever call
//! [`CrawlState::try_claim`] and [`CrawlState::add_counts`]; both are atomic per
//! key, so the final state does not depend on how tasks interleave.

use dashmap::{DashMap, DashSet};
use std::collections::HashMap;

/// Visited URLs and cumulative word counts for a single crawl
#[derive(Debug, Default)]
pub struct CrawlState {
    /// Word -> total occurrences over every fetched page
    counts: DashMap<String, u64>,

    /// URLs claimed by some task
    visited: DashSet<String>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits `url` into the visited set
    ///
    /// Returns true only for the first caller across the whole crawl; every later
    /// or racing caller gets false.
    pub fn try_claim(&self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    /// Adds a page's word counts into the running totals
    pub fn add_counts(&self, page_counts: &HashMap<String, u64>) {
        for (word, count) in page_counts {
            *self.counts.entry(word.clone()).or_insert(0) += count;
        }
    }

    /// Returns true if `url` has been claimed
    pub fn contains(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Returns the number of distinct URLs claimed
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Copies the current totals into a plain map
    pub fn word_counts(&self) -> HashMap<String, u64> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn counts(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    #[test]
    fn test_claim_once() {
        let state = CrawlState::new();
        assert!(state.try_claim("https://example.com/"));
        assert!(!state.try_claim("https://example.com/"));
        assert!(state.try_claim("https://example.com/other"));

        assert!(state.contains("https://example.com/"));
        assert!(!state.contains("https://example.com/never"));
        assert_eq!(state.visited_count(), 2);
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        let state = CrawlState::new();
        let winners = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..16 {
                scope.spawn(|| {
                    if state.try_claim("https://example.com/contested") {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(state.visited_count(), 1);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let first = counts(&[("a", 2), ("b", 1)]);
        let second = counts(&[("a", 1), ("c", 5)]);
        let expected = counts(&[("a", 3), ("b", 1), ("c", 5)]);

        let forward = CrawlState::new();
        forward.add_counts(&first);
        forward.add_counts(&second);

        let backward = CrawlState::new();
        backward.add_counts(&second);
        backward.add_counts(&first);

        assert_eq!(forward.word_counts(), expected);
        assert_eq!(backward.word_counts(), expected);
    }

    #[test]
    fn test_concurrent_merges_sum_exactly() {
        let state = CrawlState::new();
        let page = counts(&[("shared", 3), ("other", 1)]);

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        state.add_counts(&page);
                    }
                });
            }
        });

        let totals = state.word_counts();
        assert_eq!(totals["shared"], 8 * 100 * 3);
        assert_eq!(totals["other"], 8 * 100);
    }
}
