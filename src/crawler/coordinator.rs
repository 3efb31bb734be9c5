//! Crawler coordinator - recursive fan-out crawl orchestration
//!
//! Every (URL, remaining depth) pair runs as its own tokio task:
//!
//! 1. Stop if no depth is left
//! 2. Claim the URL in the run's [`VisitedSet`]; stop if another task has it
//! 3. Fetch the page; on failure report it and stop
//! 4. Spawn one child task per discovered URL with `depth - 1`
//! 5. Await every child's completion signal, in spawn order
//! 6. Signal completion to the parent
//!
//! A task is complete only once its whole subtree is complete, so awaiting
//! the root's signal awaits the entire crawl.

use crate::crawler::fetcher::Fetcher;
use crate::output::{CrawlReporter, TracingReporter};
use crate::state::{TaskState, VisitedSet};
use crate::{CrawlError, Result};
use futures::future::{BoxFuture, FutureExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// Outcome of a finished crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// URL the crawl started from
    pub seed: String,

    /// Depth the crawl was started with
    pub max_depth: u32,

    /// URLs claimed for fetching, whether or not the fetch succeeded
    pub urls_visited: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// State shared by every task of one crawl
struct Shared {
    visited: Arc<VisitedSet>,
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn CrawlReporter>,
}

/// Main crawler coordinator structure
///
/// Owns the visited set for one crawl run. Build a fresh coordinator per
/// run; two coordinators never share dedup state.
pub struct CrawlCoordinator {
    shared: Arc<Shared>,
    ran: AtomicBool,
}

impl CrawlCoordinator {
    /// Creates a coordinator that fetches through `fetcher` and logs
    /// outcomes through `tracing`
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            shared: Arc::new(Shared {
                visited: Arc::new(VisitedSet::new()),
                fetcher,
                reporter: Arc::new(TracingReporter),
            }),
            ran: AtomicBool::new(false),
        }
    }

    /// Replaces the reporter
    ///
    /// URLs already claimed stay claimed, and a coordinator that has run
    /// stays spent.
    pub fn with_reporter(self, reporter: Arc<dyn CrawlReporter>) -> Self {
        Self {
            shared: Arc::new(Shared {
                visited: Arc::clone(&self.shared.visited),
                fetcher: Arc::clone(&self.shared.fetcher),
                reporter,
            }),
            ran: self.ran,
        }
    }

    /// URLs claimed so far in this run
    pub fn visited(&self) -> &VisitedSet {
        &self.shared.visited
    }

    /// Crawls `url` and everything reachable from it within `depth` hops
    ///
    /// Completes only once the whole subtree has completed. URLs already
    /// claimed by this coordinator, including by earlier `crawl` calls, are
    /// not fetched again.
    pub async fn crawl(&self, url: &str, depth: u32) {
        let done = spawn_crawl(Arc::clone(&self.shared), url.to_string(), depth);
        if done.await.is_err() {
            tracing::warn!("Crawl task for {} ended without signaling completion", url);
        }
    }

    /// Runs a complete crawl from `seed`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - Crawl finished (individual fetch failures are
    ///   reported, not returned)
    /// * `Err(CrawlError::InvalidSeed)` - Seed is empty
    /// * `Err(CrawlError::AlreadyRan)` - This coordinator was already used
    pub async fn run(&self, seed: &str, max_depth: u32) -> Result<CrawlSummary> {
        if seed.trim().is_empty() {
            return Err(CrawlError::InvalidSeed("seed URL is empty".to_string()));
        }

        if self.ran.swap(true, Ordering::SeqCst) {
            return Err(CrawlError::AlreadyRan);
        }

        tracing::info!("Starting crawl from {} (max depth {})", seed, max_depth);
        let start_time = Instant::now();

        self.crawl(seed, max_depth).await;

        let summary = CrawlSummary {
            seed: seed.to_string(),
            max_depth,
            urls_visited: self.shared.visited.len(),
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} URLs visited in {:?}",
            summary.urls_visited,
            summary.elapsed
        );

        Ok(summary)
    }
}

/// Spawns a crawl task and returns the receiver its completion signal
/// arrives on
fn spawn_crawl(shared: Arc<Shared>, url: String, depth: u32) -> oneshot::Receiver<()> {
    let (done_tx, done_rx) = oneshot::channel();
    tokio::spawn(crawl_task(shared, url, depth, done_tx));
    done_rx
}

// Boxed so the spawned future has a concrete type despite the recursion.
fn crawl_task(
    shared: Arc<Shared>,
    url: String,
    depth: u32,
    done: oneshot::Sender<()>,
) -> BoxFuture<'static, ()> {
    async move {
        let mut task = TaskTracker::new(&url, depth);
        shared.visit(&mut task).await;

        // Release the shared state before signaling, so a finished crawl
        // leaves no task holding the fetcher or reporter.
        drop(shared);
        task.advance(TaskState::Completed);

        // The parent may have gone away if it panicked; nothing to do then.
        let _ = done.send(());
    }
    .boxed()
}

impl Shared {
    async fn visit(self: &Arc<Self>, task: &mut TaskTracker) {
        let url = task.url.clone();
        let depth = task.depth;

        if depth == 0 {
            task.advance(TaskState::DepthExhausted);
            self.reporter.depth_exhausted(&url);
            return;
        }

        if !self.visited.try_mark(&url) {
            task.advance(TaskState::AlreadyVisited);
            self.reporter.already_visited(&url, depth);
            return;
        }

        task.advance(TaskState::Fetching);
        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                task.advance(TaskState::FetchFailed);
                self.reporter.fetch_failed(&url, depth, &e);
                return;
            }
        };

        self.reporter.page_fetched(&url, depth, &page);

        task.advance(TaskState::FanningOut);
        let children: Vec<(String, oneshot::Receiver<()>)> = page
            .links
            .into_iter()
            .map(|link| {
                let done = spawn_crawl(Arc::clone(self), link.clone(), depth - 1);
                (link, done)
            })
            .collect();

        task.advance(TaskState::Joining);
        tracing::debug!("{} waiting on {} children", url, children.len());
        for (child, done) in children {
            if done.await.is_err() {
                tracing::warn!(
                    "Child task for {} (spawned by {}) ended without signaling completion",
                    child,
                    url
                );
            }
        }
    }
}

/// Walks one task through its state machine
struct TaskTracker {
    url: String,
    depth: u32,
    state: TaskState,
}

impl TaskTracker {
    fn new(url: &str, depth: u32) -> Self {
        Self {
            url: url.to_string(),
            depth,
            state: TaskState::Created,
        }
    }

    fn advance(&mut self, next: TaskState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid task transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("{} [{}]: {} -> {}", self.url, self.depth, self.state, next);
        self.state = next;
    }
}
