//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Content-Type checks
//! - Error classification into [`FetchError`]

use crate::config::{HttpConfig, UserAgentConfig};
use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher};
use crate::crawler::parser::parse_html;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Maximum redirect hops followed for a single fetch
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use depth_crawl::config::{HttpConfig, UserAgentConfig};
/// use depth_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(http.timeout_secs))
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .https_only(http.https_only)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a real HTTP client
///
/// Links are extracted from HTML bodies and resolved against the final URL
/// after redirects.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from configuration
    pub fn new(user_agent: &UserAgentConfig, http: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(user_agent, http)?))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL and extracts its links
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 404 | `NotFound` |
    /// | Other non-2xx | `Http` |
    /// | Timeout | `Timeout` |
    /// | Connection / TLS / redirect failure | `Network` |
    /// | Content-Type not HTML | `ContentMismatch` |
    /// | Body read failure | `Body` |
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return Err(FetchError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        let final_url = response.url().clone();
        if final_url.as_str() != url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let parsed = parse_html(&body, &final_url);

        Ok(FetchedPage {
            body,
            links: parsed.links,
            title: parsed.title,
        })
    }
}

/// Maps a reqwest transport error to a fetch error
fn classify_transport_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Network {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else if error.is_redirect() {
        FetchError::Network {
            url: url.to_string(),
            message: format!("Too many redirects (max {})", MAX_REDIRECTS),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
