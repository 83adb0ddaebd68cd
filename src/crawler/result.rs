//! Crawl result assembly

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;

/// The outcome of one crawl
///
/// Serializes as `{"wordCounts": {...}, "urlsVisited": n}`, with the word
/// counts object written in rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    /// The most popular words, most frequent first
    #[serde(rename = "wordCounts", serialize_with = "serialize_ranked")]
    pub word_counts: Vec<(String, u64)>,

    /// Number of distinct URLs visited
    #[serde(rename = "urlsVisited")]
    pub urls_visited: usize,
}

impl CrawlResult {
    /// Builds a result from final crawl totals
    pub fn new(counts: HashMap<String, u64>, popular_word_count: usize, urls_visited: usize) -> Self {
        Self {
            word_counts: top_words(counts, popular_word_count),
            urls_visited,
        }
    }
}

/// Selects the `n` most frequent words
///
/// Ordered by count descending; equal counts are ordered by the word itself,
/// ascending, so the selection is deterministic.
pub fn top_words(counts: HashMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_unstable_by(|(a_word, a_count), (b_word, b_count)| {
        (Reverse(a_count), a_word).cmp(&(Reverse(b_count), b_word))
    });
    ranked.truncate(n);
    ranked
}

fn serialize_ranked<S: Serializer>(ranked: &[(String, u64)], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(ranked.len()))?;
    for (word, count) in ranked {
        map.serialize_entry(word, count)?;
    }
    map.end()
}
