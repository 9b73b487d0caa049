//! Query popularity tracking
//!
//! Counts are keyed by the raw query string. Only non-empty queries are
//! counted; each counted query adds exactly one.

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// Thread-safe query counter
#[derive(Debug, Default)]
pub struct TermCounter {
    counts: Mutex<HashMap<String, u64>>,
}

impl TermCounter {
    /// Create an empty counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one use of `query`. Empty queries are ignored.
    pub fn record(&self, query: &str) {
        if query.is_empty() {
            return;
        }
        let mut counts = self.counts.lock();
        let count = counts.entry(query.to_string()).or_insert(0);
        *count += 1;
        debug!(target: "docsearch::terms", term = query, count = *count, "Recorded search term");
    }

    /// Most used queries, highest count first; equal counts in ascending
    /// lexical order. `None` returns every query.
    pub fn top(&self, limit: Option<usize>) -> Vec<String> {
        let mut entries: Vec<(String, u64)> = self
            .counts
            .lock()
            .iter()
            .map(|(term, &count)| (term.clone(), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        entries.into_iter().map(|(term, _)| term).collect()
    }

    /// Current count for a query
    pub fn count(&self, query: &str) -> u64 {
        self.counts.lock().get(query).copied().unwrap_or(0)
    }

    /// Number of distinct queries
    pub fn len(&self) -> usize {
        self.counts.lock().len()
    }

    /// Whether nothing has been counted
    pub fn is_empty(&self) -> bool {
        self.counts.lock().is_empty()
    }

    /// Copy of the whole table
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts.lock().clone()
    }
}
