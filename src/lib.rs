//! depth-crawl: a depth-bounded concurrent web crawler
//!
//! This crate implements a recursive crawler that fans out one task per
//! discovered link, fetches every URL at most once per run, and waits for each
//! fan-out level to finish before reporting its own completion.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for crawl setup and orchestration
///
/// Fetch failures are not part of this type: they are contained to the task
/// that hit them and surface through [`output::CrawlReporter`] instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    #[error("Coordinator has already run; build a new one for each crawl")]
    AlreadyRan,

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl_with, CrawlCoordinator, CrawlSummary, FetchError, FetchedPage, Fetcher};
pub use state::{TaskState, VisitedSet};
