//! Integration tests for the crawler
//!
//! Fixture-backed tests exercise the coordinator's dedup, depth, join and
//! failure-isolation behavior. The HTTP tests use wiremock to serve a small
//! site and run the full crawl cycle end-to-end.

use depth_crawl::config::{Config, CrawlerConfig, HttpConfig, UserAgentConfig};
use depth_crawl::crawler::{
    crawl, crawl_with, CrawlCoordinator, FetchError, FetchedPage, Fetcher, FixtureFetcher,
    HttpFetcher, GOLANG_SEED,
};
use depth_crawl::output::{ConsoleReporter, CrawlReporter, StatsReporter};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Reporter that remembers which URLs were fetched or failed
#[derive(Default)]
struct RecordingReporter {
    fetched: Mutex<Vec<String>>,
    failed: Mutex<Vec<String>>,
}

impl RecordingReporter {
    fn fetched(&self) -> Vec<String> {
        let mut urls = self.fetched.lock().unwrap().clone();
        urls.sort();
        urls
    }

    fn failed(&self) -> Vec<String> {
        self.failed.lock().unwrap().clone()
    }
}

impl CrawlReporter for RecordingReporter {
    fn page_fetched(&self, url: &str, _depth: u32, _page: &FetchedPage) {
        self.fetched.lock().unwrap().push(url.to_string());
    }

    fn fetch_failed(&self, url: &str, _depth: u32, _error: &FetchError) {
        self.failed.lock().unwrap().push(url.to_string());
    }
}

/// Fixture where `n0 -> n1 -> ... -> n{len-1}`
fn chain_fixture(len: usize) -> FixtureFetcher {
    let mut fixture = FixtureFetcher::new();
    for i in 0..len {
        let next = format!("n{}", i + 1);
        let links: Vec<&str> = if i + 1 < len { vec![next.as_str()] } else { vec![] };
        fixture = fixture.with_page(&format!("n{}", i), "node", &links);
    }
    fixture
}

fn create_test_config(seed: String, max_depth: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed: Some(seed),
            max_depth,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        http: HttpConfig {
            timeout_secs: 5,
            connect_timeout_secs: 2,
            https_only: false,
        },
    }
}

fn html_page(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html")
}

// ===== Fixture-backed crawls =====

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_canonical_graph_three_fetches() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .with_page("A", "a", &["B", "C"])
            .with_page("B", "b", &["A", "C"])
            .with_page("C", "c", &["A"]),
    );

    let summary = CrawlCoordinator::new(fetcher.clone())
        .run("A", 4)
        .await
        .expect("Crawl failed");

    assert_eq!(fetcher.total_fetches(), 3);
    assert_eq!(fetcher.fetched_urls(), vec!["A", "B", "C"]);
    for url in ["A", "B", "C"] {
        assert_eq!(fetcher.fetch_count(url), 1);
    }
    assert_eq!(summary.urls_visited, 3);
}

#[tokio::test]
async fn test_zero_depth_never_calls_fetcher() {
    let fetcher = Arc::new(FixtureFetcher::golang());

    let summary = CrawlCoordinator::new(fetcher.clone())
        .run(GOLANG_SEED, 0)
        .await
        .expect("Crawl failed");

    assert_eq!(fetcher.total_fetches(), 0);
    assert_eq!(summary.urls_visited, 0);
}

#[tokio::test]
async fn test_depth_bound_on_chain() {
    for max_depth in 0..6u32 {
        let fetcher = Arc::new(chain_fixture(10));

        CrawlCoordinator::new(fetcher.clone())
            .run("n0", max_depth)
            .await
            .expect("Crawl failed");

        let expected: Vec<String> = (0..max_depth).map(|i| format!("n{}", i)).collect();
        assert_eq!(
            fetcher.fetched_urls(),
            expected,
            "wrong pages fetched at max depth {}",
            max_depth
        );
    }
}

#[tokio::test]
async fn test_golang_fixture_output() {
    let fetcher = Arc::new(FixtureFetcher::golang());
    let reporter = Arc::new(ConsoleReporter::new(Vec::new()));

    let summary = crawl_with(fetcher.clone(), reporter.clone(), GOLANG_SEED, 4)
        .await
        .expect("Crawl failed");

    assert_eq!(summary.urls_visited, 5);
    assert_eq!(fetcher.total_fetches(), 5);

    let stats = reporter.statistics();
    assert_eq!(stats.pages_fetched, 4);
    assert_eq!(stats.fetch_failures, 1);

    let reporter = Arc::try_unwrap(reporter).ok().expect("reporter still shared");
    let output = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(output.contains("found: https://golang.org/ \"The Go Programming Language\""));
    assert!(output.contains("found: https://golang.org/pkg/ \"Packages\""));
    assert!(output.contains("found: https://golang.org/pkg/fmt/ \"Package fmt\""));
    assert!(output.contains("found: https://golang.org/pkg/os/ \"Package os\""));
    assert!(output.contains("not found: https://golang.org/cmd/"));
    assert_eq!(output.matches("not found: https://golang.org/cmd/").count(), 1);
}

#[tokio::test]
async fn test_failure_is_isolated_to_its_subtree() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .with_page("seed", "s", &["broken", "ok"])
            .with_page("ok", "ok", &["ok/child"])
            .with_page("ok/child", "child", &["ok/grandchild"])
            .with_page("ok/grandchild", "grandchild", &[]),
    );
    let reporter = Arc::new(RecordingReporter::default());

    crawl_with(fetcher.clone(), reporter.clone(), "seed", 4)
        .await
        .expect("Crawl failed");

    assert_eq!(reporter.failed(), vec!["broken"]);
    assert_eq!(
        reporter.fetched(),
        vec!["ok", "ok/child", "ok/grandchild", "seed"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_dense_graph_fetches_each_url_once() {
    let names: Vec<String> = (0..40).map(|i| format!("p{}", i)).collect();
    let links: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut fixture = FixtureFetcher::new();
    for name in &names {
        fixture = fixture.with_page(name, "dense", &links);
    }
    let fetcher = Arc::new(fixture);
    let stats = Arc::new(StatsReporter::new());

    let summary = crawl_with(fetcher.clone(), stats.clone(), "p0", 3)
        .await
        .expect("Crawl failed");

    assert_eq!(summary.urls_visited, 40);
    assert_eq!(fetcher.total_fetches(), 40);
    for name in &names {
        assert_eq!(fetcher.fetch_count(name), 1, "{} fetched more than once", name);
    }

    let counts = stats.snapshot();
    assert_eq!(counts.pages_fetched, 40);
    assert_eq!(counts.links_discovered, 40 * 40);
}

#[tokio::test]
async fn test_crawl_waits_for_slow_grandchild() {
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .with_page("root", "r", &["fast", "slow"])
            .with_page("fast", "f", &[])
            .with_page("slow", "s", &["slowest"])
            .with_page("slowest", "z", &[])
            .with_delay("slowest", Duration::from_millis(200)),
    );
    let reporter = Arc::new(RecordingReporter::default());

    let start = Instant::now();
    crawl_with(fetcher.clone(), reporter.clone(), "root", 3)
        .await
        .expect("Crawl failed");

    assert!(start.elapsed() >= Duration::from_millis(200));
    assert!(reporter.fetched().contains(&"slowest".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_siblings_are_fetched_concurrently() {
    let children: Vec<String> = (0..10).map(|i| format!("c{}", i)).collect();
    let links: Vec<&str> = children.iter().map(String::as_str).collect();

    let mut fixture = FixtureFetcher::new().with_page("root", "r", &links);
    for child in &children {
        fixture = fixture
            .with_page(child, "leaf", &[])
            .with_delay(child, Duration::from_millis(200));
    }

    let start = Instant::now();
    CrawlCoordinator::new(Arc::new(fixture))
        .run("root", 2)
        .await
        .expect("Crawl failed");

    // One after another would take at least 2s
    assert!(
        start.elapsed() < Duration::from_secs(1),
        "siblings appear to run sequentially: {:?}",
        start.elapsed()
    );
}

/// Fetcher that fails for every URL
struct AlwaysFails;

#[async_trait::async_trait]
impl Fetcher for AlwaysFails {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        Err(FetchError::Network {
            url: url.to_string(),
            message: "unreachable".to_string(),
        })
    }
}

#[tokio::test]
async fn test_failing_fetcher_still_completes() {
    let stats = Arc::new(StatsReporter::new());
    let summary = crawl_with(Arc::new(AlwaysFails), stats.clone(), "anything", 5)
        .await
        .expect("Crawl failed");

    assert_eq!(summary.urls_visited, 1);
    assert_eq!(stats.snapshot().fetch_failures, 1);
}

// ===== HTTP crawls =====

#[tokio::test]
async fn test_full_crawl_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page(
            r#"<html><body><a href="/">Home</a><a href="page2">Page 2</a></body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_page(
            r#"<html><body><a href="/page3">Page 3</a></body></html>"#.to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Two hops from the seed, so reachable with depth 3
    Mock::given(method("GET"))
        .and(path("/page3"))
        .respond_with(html_page(
            r#"<html><body><a href="/page4">Page 4</a></body></html>"#.to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Three hops away: beyond the depth bound
    Mock::given(method("GET"))
        .and(path("/page4"))
        .respond_with(html_page("<html></html>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/", base_url), 3);
    let summary = crawl(&config).await.expect("Crawl failed");

    assert_eq!(summary.urls_visited, 4);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_http_failure_isolation() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body><a href="/gone">Gone</a><a href="/ok">OK</a></body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_page(
            r#"<html><body><a href="/ok/child">Child</a></body></html>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok/child"))
        .respond_with(html_page("<html><body>leaf</body></html>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&UserAgentConfig::default(), &HttpConfig::default())
        .expect("Failed to build fetcher");
    let reporter = Arc::new(RecordingReporter::default());

    crawl_with(
        Arc::new(fetcher),
        reporter.clone(),
        &format!("{}/", base_url),
        3,
    )
    .await
    .expect("Crawl failed");

    assert_eq!(reporter.failed(), vec![format!("{}/gone", base_url)]);
    assert!(reporter
        .fetched()
        .contains(&format!("{}/ok/child", base_url)));
    mock_server.verify().await;
}

#[tokio::test]
async fn test_http_zero_depth_sends_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_page("<html></html>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/", mock_server.uri()), 0);
    let summary = crawl(&config).await.expect("Crawl failed");

    assert_eq!(summary.urls_visited, 0);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_http_fetcher_error_classification() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0x89u8, 0x50, 0x4e, 0x47], "image/png"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&UserAgentConfig::default(), &HttpConfig::default())
        .expect("Failed to build fetcher");

    let missing = fetcher.fetch(&format!("{}/missing", base_url)).await;
    assert_eq!(
        missing,
        Err(FetchError::NotFound {
            url: format!("{}/missing", base_url)
        })
    );

    let image = fetcher.fetch(&format!("{}/image.png", base_url)).await;
    assert!(matches!(
        image,
        Err(FetchError::ContentMismatch { ref content_type, .. }) if content_type == "image/png"
    ));

    let error = fetcher.fetch(&format!("{}/error", base_url)).await;
    assert!(matches!(error, Err(FetchError::Http { status: 503, .. })));
}

#[tokio::test]
async fn test_http_fetcher_extracts_title_and_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html_page(
            r##"<html><head><title>Docs</title></head><body>
            <a href="intro">Intro</a>
            <a href="#top">Top</a>
            <a href="mailto:docs@example.com">Mail</a>
            <a href="https://other.example/x">Other</a>
            </body></html>"##
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&UserAgentConfig::default(), &HttpConfig::default())
        .expect("Failed to build fetcher");
    let page = fetcher
        .fetch(&format!("{}/docs/", base_url))
        .await
        .expect("Fetch failed");

    assert_eq!(page.title.as_deref(), Some("Docs"));
    assert_eq!(
        page.links,
        vec![
            format!("{}/docs/intro", base_url),
            "https://other.example/x".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_http_links_resolve_against_redirect_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/manual"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/manual/v2/"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/manual/v2/"))
        .respond_with(html_page(
            r#"<html><body><a href="guide">Guide</a><a href="guide#setup">Setup</a></body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&UserAgentConfig::default(), &HttpConfig::default())
        .expect("Failed to build fetcher");
    let page = fetcher
        .fetch(&format!("{}/manual", base_url))
        .await
        .expect("Fetch failed");

    assert_eq!(page.links, vec![format!("{}/manual/v2/guide", base_url)]);
}

#[tokio::test]
async fn test_crawl_without_seed_is_an_error() {
    let mut config = create_test_config("https://example.com/".to_string(), 2);
    config.crawler.seed = None;

    let result = crawl(&config).await;
    assert!(matches!(
        result,
        Err(depth_crawl::CrawlError::InvalidSeed(_))
    ));
}
