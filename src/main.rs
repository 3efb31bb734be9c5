//! depth-crawl main entry point
//!
//! This is the command-line interface for the depth-crawl crawler.

use anyhow::{bail, Context};
use clap::Parser;
use depth_crawl::config::{load_config_with_hash, validate, validate_settings, Config};
use depth_crawl::crawler::{CrawlCoordinator, Fetcher, FixtureFetcher, HttpFetcher};
use depth_crawl::output::{print_statistics, ConsoleReporter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// depth-crawl: a depth-bounded concurrent web crawler
///
/// Starting from a seed URL, fetches pages and follows their links up to a
/// fixed depth, fetching every URL at most once.
#[derive(Parser, Debug)]
#[command(name = "depth-crawl")]
#[command(version)]
#[command(about = "A depth-bounded concurrent web crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from (overrides the config file)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Maximum number of link hops to follow (overrides the config file)
    #[arg(short, long)]
    depth: Option<u32>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Serve pages from a TOML fixture file instead of the network
    #[arg(long, value_name = "FILE", conflicts_with = "demo")]
    fixture: Option<PathBuf>,

    /// Crawl the built-in golang.org fixture
    #[arg(long)]
    demo: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Print crawl statistics when the crawl finishes
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let fixture = if cli.demo {
        Some(FixtureFetcher::golang())
    } else if let Some(path) = &cli.fixture {
        let fixture = FixtureFetcher::load(path)
            .with_context(|| format!("failed to load fixture {}", path.display()))?;
        tracing::info!("Loaded {} fixture pages from {}", fixture.page_count(), path.display());
        Some(fixture)
    } else {
        None
    };

    // Seed precedence: command line, then config file, then fixture
    if let Some(seed) = cli.seed.clone() {
        config.crawler.seed = Some(seed);
    } else if config.crawler.seed.is_none() {
        config.crawler.seed = fixture.as_ref().and_then(|f| f.seed()).map(str::to_string);
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }

    // Fixture pages are keyed by name, so only HTTP crawls need a URL seed
    if fixture.is_some() {
        validate_settings(&config).context("invalid settings")?;
    } else {
        validate(&config).context("invalid settings")?;
    }

    let Some(seed) = config.crawler.seed.clone() else {
        bail!("no seed URL given; pass one on the command line or set crawler.seed");
    };

    if cli.dry_run {
        handle_dry_run(&config, &seed, fixture.as_ref());
        return Ok(());
    }

    let fetcher: Arc<dyn Fetcher> = match fixture {
        Some(fixture) => Arc::new(fixture),
        None => Arc::new(
            HttpFetcher::new(&config.user_agent, &config.http)
                .context("failed to build HTTP client")?,
        ),
    };

    handle_crawl(fetcher, &seed, config.crawler.max_depth, cli.stats).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("depth_crawl=info,warn"),
            1 => EnvFilter::new("depth_crawl=debug,info"),
            2 => EnvFilter::new("depth_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config, seed: &str, fixture: Option<&FixtureFetcher>) {
    println!("=== depth-crawl Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed: {}", seed);
    println!("  Max depth: {}", config.crawler.max_depth);

    match fixture {
        Some(fixture) => {
            println!("\nFetcher: fixture ({} pages)", fixture.page_count());
        }
        None => {
            println!("\nFetcher: HTTP");
            println!("  User agent: {}", config.user_agent.header_value());
            println!("  Timeout: {}s", config.http.timeout_secs);
            println!("  Connect timeout: {}s", config.http.connect_timeout_secs);
            println!("  HTTPS only: {}", config.http.https_only);
        }
    }

    println!("\n✓ Settings are valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    fetcher: Arc<dyn Fetcher>,
    seed: &str,
    max_depth: u32,
    show_stats: bool,
) -> anyhow::Result<()> {
    let reporter = Arc::new(ConsoleReporter::stdout());
    let coordinator = CrawlCoordinator::new(fetcher).with_reporter(reporter.clone());

    let summary = coordinator.run(seed, max_depth).await?;

    if show_stats {
        println!();
        print_statistics(&reporter.statistics(), &summary);
    }

    Ok(())
}
