//! Console reporter
//!
//! Prints one line per fetched page (`found: <url> "<body>"`) and one line per
//! failed fetch, while counting outcomes for the statistics block.

use crate::crawler::{FetchError, FetchedPage};
use crate::output::{CrawlReporter, CrawlStatistics, StatsReporter};
use std::io::{self, Write};
use std::sync::Mutex;

/// Reporter that writes crawl results to a stream
#[derive(Debug)]
pub struct ConsoleReporter<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
    stats: StatsReporter,
}

impl ConsoleReporter<io::Stdout> {
    /// Reporter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            stats: StatsReporter::new(),
        }
    }

    /// Counts of everything reported so far
    pub fn statistics(&self) -> CrawlStatistics {
        self.stats.snapshot()
    }

    /// Consumes the reporter and returns the underlying writer
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_line(&self, line: std::fmt::Arguments<'_>) {
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        if let Err(e) = writeln!(out, "{}", line) {
            tracing::debug!("console reporter write failed: {}", e);
        }
    }
}

impl<W: Write + Send> CrawlReporter for ConsoleReporter<W> {
    fn page_fetched(&self, url: &str, depth: u32, page: &FetchedPage) {
        self.stats.page_fetched(url, depth, page);
        self.write_line(format_args!("found: {} {:?}", url, page.body));
    }

    fn fetch_failed(&self, url: &str, depth: u32, error: &FetchError) {
        self.stats.fetch_failed(url, depth, error);
        self.write_line(format_args!("{}", error));
    }

    fn already_visited(&self, url: &str, depth: u32) {
        self.stats.already_visited(url, depth);
    }

    fn depth_exhausted(&self, url: &str) {
        self.stats.depth_exhausted(url);
    }
}
