//! Reporter trait and basic implementations
//!
//! A reporter is told about every task outcome. It is shared by all tasks of
//! a crawl, so implementations must synchronize their own state.

use crate::crawler::{FetchError, FetchedPage};

/// Receives crawl task outcomes
///
/// All methods default to doing nothing, so implementations only override
/// the events they care about. Methods are called from many tasks at once and
/// must not block for long.
pub trait CrawlReporter: Send + Sync {
    /// A page was fetched successfully; its children are about to be spawned
    fn page_fetched(&self, _url: &str, _depth: u32, _page: &FetchedPage) {}

    /// A fetch failed; the subtree below `url` is abandoned
    fn fetch_failed(&self, _url: &str, _depth: u32, _error: &FetchError) {}

    /// Another task already claimed `url`
    fn already_visited(&self, _url: &str, _depth: u32) {}

    /// `url` was reached with no depth left
    fn depth_exhausted(&self, _url: &str) {}
}

/// Reporter that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl CrawlReporter for NoopReporter {}

/// Reporter that logs events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl CrawlReporter for TracingReporter {
    fn page_fetched(&self, url: &str, depth: u32, page: &FetchedPage) {
        tracing::info!(
            "found: {} ({} links, depth {} remaining)",
            url,
            page.links.len(),
            depth
        );
    }

    fn fetch_failed(&self, url: &str, depth: u32, error: &FetchError) {
        tracing::warn!("fetch failed at depth {} for {}: {}", depth, url, error);
    }

    fn already_visited(&self, url: &str, depth: u32) {
        tracing::debug!("skipping {} (already visited, depth {})", url, depth);
    }

    fn depth_exhausted(&self, url: &str) {
        tracing::trace!("not following {} (depth exhausted)", url);
    }
}
