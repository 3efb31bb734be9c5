//! Fixture-backed fetcher
//!
//! Serves canned pages from memory. Used for demos, tests, and offline runs.
//! Fixtures can be built in code or loaded from a TOML file:
//!
//! ```toml
//! seed = "https://golang.org/"
//!
//! [pages."https://golang.org/"]
//! body = "The Go Programming Language"
//! links = ["https://golang.org/pkg/", "https://golang.org/cmd/"]
//! delay-ms = 50
//! ```

use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher};
use crate::CrawlError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// Seed URL of the built-in golang.org fixture
pub const GOLANG_SEED: &str = "https://golang.org/";

/// One canned page
#[derive(Debug, Clone, Deserialize)]
pub struct FixturePage {
    pub body: String,

    #[serde(default)]
    pub links: Vec<String>,

    /// Artificial latency before the page is returned
    #[serde(rename = "delay-ms", default)]
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    seed: Option<String>,
    #[serde(default)]
    pages: HashMap<String, FixturePage>,
}

/// Fetcher that answers from a fixed URL graph
///
/// Unknown URLs fail with [`FetchError::NotFound`]. Every call is counted,
/// including failed ones.
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    seed: Option<String>,
    pages: HashMap<String, FixturePage>,
    fetch_counts: Mutex<HashMap<String, usize>>,
}

impl FixtureFetcher {
    /// Creates an empty fixture
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page
    pub fn with_page(mut self, url: &str, body: &str, links: &[&str]) -> Self {
        self.pages.insert(
            url.to_string(),
            FixturePage {
                body: body.to_string(),
                links: links.iter().map(|l| l.to_string()).collect(),
                delay_ms: None,
            },
        );
        self
    }

    /// Makes an existing page answer only after `delay`
    ///
    /// Has no effect if `url` has not been added.
    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        if let Some(page) = self.pages.get_mut(url) {
            page.delay_ms = Some(delay.as_millis() as u64);
        }
        self
    }

    /// Sets the seed URL the fixture suggests starting from
    pub fn with_seed(mut self, seed: &str) -> Self {
        self.seed = Some(seed.to_string());
        self
    }

    /// Parses a fixture from TOML text
    pub fn from_toml(content: &str) -> Result<Self, CrawlError> {
        let file: FixtureFile =
            toml::from_str(content).map_err(|e| CrawlError::Fixture(e.to_string()))?;

        if let Some(seed) = &file.seed {
            if !file.pages.contains_key(seed) {
                tracing::warn!("Fixture seed {} has no page entry", seed);
            }
        }

        Ok(Self {
            seed: file.seed,
            pages: file.pages,
            fetch_counts: Mutex::new(HashMap::new()),
        })
    }

    /// Loads a fixture file
    pub fn load(path: &Path) -> Result<Self, CrawlError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The small golang.org site graph
    ///
    /// `https://golang.org/cmd/` is linked but has no page, so fetching it
    /// fails with `NotFound`.
    pub fn golang() -> Self {
        Self::new()
            .with_seed(GOLANG_SEED)
            .with_page(
                "https://golang.org/",
                "The Go Programming Language",
                &["https://golang.org/pkg/", "https://golang.org/cmd/"],
            )
            .with_page(
                "https://golang.org/pkg/",
                "Packages",
                &[
                    "https://golang.org/",
                    "https://golang.org/cmd/",
                    "https://golang.org/pkg/fmt/",
                    "https://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "https://golang.org/pkg/fmt/",
                "Package fmt",
                &["https://golang.org/", "https://golang.org/pkg/"],
            )
            .with_page(
                "https://golang.org/pkg/os/",
                "Package os",
                &["https://golang.org/", "https://golang.org/pkg/"],
            )
    }

    pub fn seed(&self) -> Option<&str> {
        self.seed.as_deref()
    }

    /// Number of pages in the fixture
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// How many times `url` has been fetched
    pub fn fetch_count(&self, url: &str) -> usize {
        self.counts().get(url).copied().unwrap_or(0)
    }

    /// Total number of fetch calls across all URLs
    pub fn total_fetches(&self) -> usize {
        self.counts().values().sum()
    }

    /// Every URL fetched at least once, sorted
    pub fn fetched_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.counts().keys().cloned().collect();
        urls.sort();
        urls
    }

    fn counts(&self) -> std::sync::MutexGuard<'_, HashMap<String, usize>> {
        self.fetch_counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        *self.counts().entry(url.to_string()).or_insert(0) += 1;

        let page = self.pages.get(url).ok_or_else(|| FetchError::NotFound {
            url: url.to_string(),
        })?;

        if let Some(ms) = page.delay_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        Ok(FetchedPage::new(page.body.clone(), page.links.clone()))
    }
}
