//! Full-match pattern lists
//!
//! Ignored URLs and ignored words are configured as regular expressions. A candidate
//! is ignored only when some pattern matches the *whole* string, never a substring.

use crate::{ConfigError, ConfigResult};
use regex::Regex;

/// An ordered list of compiled full-match patterns
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compiles every source pattern, anchoring it at both ends
    ///
    /// # Arguments
    ///
    /// * `sources` - The raw regular expressions, in configuration order
    ///
    /// # Returns
    ///
    /// * `Ok(PatternSet)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - The first pattern that failed to compile
    ///
    /// # Examples
    ///
    /// ```
    /// use tally_crawl::pattern::PatternSet;
    ///
    /// let patterns = PatternSet::compile(&["https://example\\.com/private/.*".to_string()]).unwrap();
    /// assert!(patterns.matches("https://example.com/private/a"));
    /// assert!(!patterns.matches("https://example.com/public"));
    /// ```
    pub fn compile(sources: &[String]) -> ConfigResult<Self> {
        let patterns = sources
            .iter()
            .map(|source| {
                Regex::new(&format!("^(?:{})$", source)).map_err(|e| ConfigError::InvalidPattern {
                    pattern: source.clone(),
                    source: e,
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Returns true if any pattern matches the entire candidate
    pub fn matches(&self, candidate: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(candidate))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
