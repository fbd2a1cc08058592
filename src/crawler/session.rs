//! Per-crawl shared state: the visited set and the stats counters
//!
//! One `CrawlSession` is created per root crawl and shared by every traversal
//! branch beneath it. Branches run on a multi-threaded runtime, so the visited
//! set sits behind a mutex and the counters are atomic.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Shared state for one root crawl invocation
#[derive(Debug, Default)]
pub struct CrawlSession {
    visited: Mutex<HashSet<String>>,
    pub stats: CrawlStats,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL visited; returns false if it was already visited
    ///
    /// The check and the insert are one atomic step, so concurrent siblings
    /// racing on the same URL cannot both claim it.
    pub fn mark_visited(&self, url: &str) -> bool {
        self.visited.lock().unwrap().insert(url.to_string())
    }

    /// Returns true if the URL has been visited in this session
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.lock().unwrap().contains(url)
    }

    /// Number of URLs visited so far
    pub fn visited_count(&self) -> usize {
        self.visited.lock().unwrap().len()
    }
}

/// Crawl-wide counters, mutated by every traversal node
#[derive(Debug, Default)]
pub struct CrawlStats {
    total_sublinks: AtomicU64,
    fetched_sublinks: AtomicU64,
    error_count: AtomicU64,
    saved_count: AtomicU64,
}

impl CrawlStats {
    pub fn record_sublink(&self) {
        self.total_sublinks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetched_sublinks(&self, count: u64) {
        self.fetched_sublinks.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_saved(&self) {
        self.saved_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads all counters at once for reporting
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_sublinks: self.total_sublinks.load(Ordering::Relaxed),
            fetched_sublinks: self.fetched_sublinks.load(Ordering::Relaxed),
            error_count: self.error_count.load(Ordering::Relaxed),
            saved_count: self.saved_count.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of the crawl counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_sublinks: u64,
    pub fetched_sublinks: u64,
    pub error_count: u64,
    pub saved_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_visited_once() {
        let session = CrawlSession::new();
        assert!(session.mark_visited("https://example.com/"));
        assert!(!session.mark_visited("https://example.com/"));
        assert_eq!(session.visited_count(), 1);
    }

    #[test]
    fn test_is_visited() {
        let session = CrawlSession::new();
        assert!(!session.is_visited("https://example.com/"));
        session.mark_visited("https://example.com/");
        assert!(session.is_visited("https://example.com/"));
    }

    #[test]
    fn test_stats_accumulate() {
        let stats = CrawlStats::default();
        stats.record_sublink();
        stats.record_sublink();
        stats.record_fetched_sublinks(2);
        stats.record_error();
        stats.record_saved();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_sublinks, 2);
        assert_eq!(snapshot.fetched_sublinks, 2);
        assert_eq!(snapshot.error_count, 1);
        assert_eq!(snapshot.saved_count, 1);
    }

    #[test]
    fn test_fresh_snapshot_is_zero() {
        assert_eq!(CrawlStats::default().snapshot(), StatsSnapshot::default());
    }
}
