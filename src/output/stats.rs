//! Crawl statistics
//!
//! This module provides a reporter that counts task outcomes and the
//! formatting used to display them once a crawl finishes.

use crate::crawler::{CrawlSummary, FetchError, FetchedPage};
use crate::output::CrawlReporter;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Pages fetched successfully
    pub pages_fetched: u64,

    /// Fetches that failed
    pub fetch_failures: u64,

    /// Links handed to child tasks
    pub links_discovered: u64,

    /// Tasks that found their URL already claimed
    pub already_visited: u64,

    /// Tasks that stopped because no depth was left
    pub depth_exhausted: u64,
}

impl CrawlStatistics {
    /// Number of fetcher invocations
    pub fn fetch_attempts(&self) -> u64 {
        self.pages_fetched + self.fetch_failures
    }

    /// Total number of tasks that ran, including the root
    pub fn tasks(&self) -> u64 {
        self.fetch_attempts() + self.already_visited + self.depth_exhausted
    }
}

/// Reporter that counts outcomes
#[derive(Debug, Default)]
pub struct StatsReporter {
    pages_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    links_discovered: AtomicU64,
    already_visited: AtomicU64,
    depth_exhausted: AtomicU64,
}

impl StatsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current counts
    pub fn snapshot(&self) -> CrawlStatistics {
        CrawlStatistics {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            links_discovered: self.links_discovered.load(Ordering::Relaxed),
            already_visited: self.already_visited.load(Ordering::Relaxed),
            depth_exhausted: self.depth_exhausted.load(Ordering::Relaxed),
        }
    }
}

impl CrawlReporter for StatsReporter {
    fn page_fetched(&self, _url: &str, _depth: u32, page: &FetchedPage) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
        self.links_discovered
            .fetch_add(page.links.len() as u64, Ordering::Relaxed);
    }

    fn fetch_failed(&self, _url: &str, _depth: u32, _error: &FetchError) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn already_visited(&self, _url: &str, _depth: u32) {
        self.already_visited.fetch_add(1, Ordering::Relaxed);
    }

    fn depth_exhausted(&self, _url: &str) {
        self.depth_exhausted.fetch_add(1, Ordering::Relaxed);
    }
}

/// Formats statistics for display
pub fn render_statistics(stats: &CrawlStatistics, summary: &CrawlSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Statistics ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Seed: {}", summary.seed);
    let _ = writeln!(out, "  Max depth: {}", summary.max_depth);
    let _ = writeln!(out, "  URLs visited: {}", summary.urls_visited);
    let _ = writeln!(out, "  Elapsed: {:.2?}", summary.elapsed);
    let _ = writeln!(out);

    let _ = writeln!(out, "Tasks ({}):", stats.tasks());
    let _ = writeln!(out, "  Pages fetched: {}", stats.pages_fetched);
    let _ = writeln!(out, "  Fetch failures: {}", stats.fetch_failures);
    let _ = writeln!(out, "  Already visited: {}", stats.already_visited);
    let _ = writeln!(out, "  Depth exhausted: {}", stats.depth_exhausted);
    let _ = writeln!(out, "  Links discovered: {}", stats.links_discovered);
    let _ = writeln!(out);

    let attempts = stats.fetch_attempts();
    let success_rate = if attempts > 0 {
        (stats.pages_fetched as f64 / attempts as f64) * 100.0
    } else {
        0.0
    };

    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} fetches succeeded)",
        success_rate, stats.pages_fetched, attempts
    );

    out
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics, summary: &CrawlSummary) {
    print!("{}", render_statistics(stats, summary));
}
