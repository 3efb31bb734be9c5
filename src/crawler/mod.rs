//! Crawler module for recursive, concurrent page fetching
//!
//! This module contains the core crawling logic, including:
//! - The fetcher capability and its HTTP and fixture implementations
//! - HTML parsing and link extraction
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod fixture;
mod http;
mod parser;

pub use coordinator::{CrawlCoordinator, CrawlSummary};
pub use fetcher::{FetchError, FetchedPage, Fetcher};
pub use fixture::{FixtureFetcher, FixturePage, GOLANG_SEED};
pub use http::{build_http_client, HttpFetcher};
pub use parser::{parse_html, ParsedPage};

use crate::config::{validate, Config};
use crate::output::{CrawlReporter, TracingReporter};
use crate::{CrawlError, Result};
use std::sync::Arc;

/// Crawls from `seed` with the given collaborators
///
/// Builds a fresh coordinator, so no visited state is shared with any other
/// call.
///
/// # Example
///
/// ```
/// use depth_crawl::crawler::{crawl_with, FixtureFetcher};
/// use depth_crawl::output::NoopReporter;
/// use std::sync::Arc;
///
/// # async fn example() -> depth_crawl::Result<()> {
/// let fetcher = Arc::new(FixtureFetcher::golang());
/// let summary = crawl_with(fetcher, Arc::new(NoopReporter), "https://golang.org/", 4).await?;
/// assert_eq!(summary.urls_visited, 5);
/// # Ok(())
/// # }
/// ```
pub async fn crawl_with(
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn CrawlReporter>,
    seed: &str,
    max_depth: u32,
) -> Result<CrawlSummary> {
    CrawlCoordinator::new(fetcher)
        .with_reporter(reporter)
        .run(seed, max_depth)
        .await
}

/// Runs a complete crawl over HTTP as described by `config`
///
/// This is the main entry point for a configured crawl. It will:
/// 1. Validate the configuration and require a seed
/// 2. Build the HTTP client
/// 3. Crawl from the seed, logging outcomes through `tracing`
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed
/// * `Err(CrawlError)` - Configuration or client setup failed
pub async fn crawl(config: &Config) -> Result<CrawlSummary> {
    validate(config)?;

    let seed = config
        .crawler
        .seed
        .as_deref()
        .ok_or_else(|| CrawlError::InvalidSeed("no seed URL configured".to_string()))?;

    let fetcher = HttpFetcher::new(&config.user_agent, &config.http)?;
    crawl_with(
        Arc::new(fetcher),
        Arc::new(TracingReporter),
        seed,
        config.crawler.max_depth,
    )
    .await
}
