//! Output module for reporting crawl progress and results
//!
//! The coordinator reports every task outcome to a [`CrawlReporter`]. This
//! module provides the reporter trait and the implementations the binary uses:
//! - `TracingReporter`: logs events through `tracing`
//! - `ConsoleReporter`: prints fetched pages and failures
//! - `StatsReporter`: counts outcomes for the end-of-run statistics block

mod console;
pub mod stats;
mod traits;

pub use console::ConsoleReporter;
pub use stats::{print_statistics, render_statistics, CrawlStatistics, StatsReporter};
pub use traits::{CrawlReporter, NoopReporter, TracingReporter};
