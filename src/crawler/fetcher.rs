//! Fetcher capability
//!
//! The coordinator never talks to the network directly. It is handed a
//! [`Fetcher`] that, given a URL, either returns the page body together with
//! the URLs found on it, or fails.

use async_trait::async_trait;
use thiserror::Error;

/// A successfully fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    /// Page body content
    pub body: String,

    /// URLs discovered on the page, in document order
    pub links: Vec<String>,

    /// Page title (if the fetcher extracted one)
    pub title: Option<String>,
}

impl FetchedPage {
    /// Creates a page from a body and its outbound links
    pub fn new(body: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            body: body.into(),
            links,
            title: None,
        }
    }
}

/// Reasons a single fetch can fail
///
/// Every variant is local to the task that hit it: the crawl carries on
/// everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("request timeout for {url}")]
    Timeout { url: String },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("expected HTML from {url}, got '{content_type}'")]
    ContentMismatch { url: String, content_type: String },

    #[error("failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::NotFound { url }
            | Self::Http { url, .. }
            | Self::Timeout { url }
            | Self::Network { url, .. }
            | Self::ContentMismatch { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}

/// Retrieves a page and the URLs it links to
///
/// Implementations must be shareable across tasks; the coordinator calls
/// `fetch` concurrently from many tasks at once.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}
