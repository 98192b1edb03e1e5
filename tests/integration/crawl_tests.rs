//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl-then-score cycle end-to-end against a temporary output directory.

use async_trait::async_trait;
use geo_readiness::config::{
    Config, CrawlerConfig, OutputConfig, PolicyConfig, RenderConfig, SiteConfig, UserAgentConfig,
};
use geo_readiness::crawler::{run_crawl, Coordinator, RenderError, RenderStrategy};
use geo_readiness::output::build_scorecard;
use geo_readiness::state::PageState;
use geo_readiness::storage::{
    JsonDirStore, Storage, REPORT_ARTIFACT, ROBOTS_ARTIFACT, SITEMAP_ARTIFACT, SUMMARY_ARTIFACT,
};
use geo_readiness::{GeoError, RenderProvenance};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the mock site with delays disabled
fn create_test_config(base_url: &str, output: &Path, follow_sitemap: bool) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            seeds: vec![],
        },
        crawler: CrawlerConfig {
            max_pages: 20,
            request_delay_ms: 0,
            request_timeout_secs: 5,
            follow_sitemap,
            sitemap_delay_ms: 0,
        },
        render: RenderConfig {
            enabled: false,
            ..RenderConfig::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            directory: output.display().to_string(),
        },
        policy: PolicyConfig::default(),
    }
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html; charset=utf-8")
}

fn xml(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "application/xml")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn home_page() -> String {
    format!(
        r#"<html lang="ko"><head>
            <title>Home</title>
            <meta name="description" content="{}">
            <link rel="canonical" href="/">
            <meta property="og:title" content="Home">
            <script type="application/ld+json">{{"@type": "Organization", "name": "X"}}</script>
        </head><body>
            <nav><a href="/about">About us</a></nav>
            <h1>Welcome</h1>
            <p>{}</p>
            <h2>Details</h2>
            <a href="/report.pdf">Report</a>
            <a href="/missing">Old page</a>
            <a href="https://external.example.org/">Partner</a>
        </body></html>"#,
        "d".repeat(80),
        "Answer text for the home page. ".repeat(10)
    )
}

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "User-agent: GPTBot\nDisallow: /about\n\nUser-agent: *\nAllow: /\n",
        ))
        .mount(server)
        .await;

    mount_page(server, "/", home_page()).await;
    mount_page(
        server,
        "/about",
        "<html><head><title>About</title></head><body><h1>About</h1><a href=\"/\">Home</a></body></html>"
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 32], "application/pdf"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_writes_records_and_artifacts() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();

    let config = create_test_config(&server.uri(), dir.path(), false);
    let outcome = run_crawl(config, Some("cafebabe".to_string())).await.unwrap();

    assert_eq!(outcome.records.len(), 2);
    for name in [
        "index.json",
        "about.json",
        ROBOTS_ARTIFACT,
        SITEMAP_ARTIFACT,
        SUMMARY_ARTIFACT,
        REPORT_ARTIFACT,
    ] {
        assert!(dir.path().join(name).is_file(), "missing {}", name);
    }
    assert!(!dir.path().join("report_pdf.json").exists());
    assert!(!dir.path().join("missing.json").exists());

    let home = &outcome.records[0];
    assert_eq!(home.slug, "index");
    assert_eq!(home.title.as_deref(), Some("Home"));
    assert_eq!(home.rendered_with, RenderProvenance::Direct);
    assert!(home.has_structured_data);
    assert_eq!(home.external_links.len(), 1);

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(SUMMARY_ARTIFACT)).unwrap())
            .unwrap();
    assert_eq!(summary["page_count"], 2);
    assert_eq!(summary["config_hash"], "cafebabe");
    assert_eq!(summary["outcomes"]["processed"], 2);
    assert_eq!(summary["outcomes"]["content_mismatch"], 1);
    assert_eq!(summary["outcomes"]["dead_link"], 1);
    let blocked = summary["robots_txt"]["blocked_pages"]["GPTBot"]
        .as_array()
        .unwrap();
    assert_eq!(blocked.len(), 1);
    assert!(blocked[0].as_str().unwrap().ends_with("/about"));

    let report = std::fs::read_to_string(dir.path().join(REPORT_ARTIFACT)).unwrap();
    assert!(report.contains("## Robots.txt Analysis"));
    assert!(report.contains("| GPTBot | partially-blocked | /about | GPTBot |"));
    assert!(report.contains("- [About us]("));
}

#[tokio::test]
async fn test_skipped_pages_produce_no_records() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();

    let config = create_test_config(&server.uri(), dir.path(), false);
    let outcome = run_crawl(config, None).await.unwrap();

    assert_eq!(outcome.summary.outcomes.get(PageState::ContentMismatch), 1);
    assert_eq!(outcome.summary.outcomes.get(PageState::DeadLink), 1);
    assert!(outcome
        .records
        .iter()
        .all(|r| !r.url.ends_with("/report.pdf") && !r.url.ends_with("/missing")));

    let loaded = JsonDirStore::open(dir.path()).load_pages().unwrap();
    assert_eq!(loaded.records.len(), 2);
}

#[tokio::test]
async fn test_recrawl_is_deterministic() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let first = run_crawl(create_test_config(&server.uri(), first_dir.path(), false), None)
        .await
        .unwrap();
    let second = run_crawl(create_test_config(&server.uri(), second_dir.path(), false), None)
        .await
        .unwrap();

    let without_timestamp = |records: &[geo_readiness::PageRecord]| -> Vec<serde_json::Value> {
        records
            .iter()
            .map(|r| {
                let mut value = serde_json::to_value(r).unwrap();
                if let Some(obj) = value.as_object_mut() {
                    obj.remove("crawled_at");
                }
                value
            })
            .collect()
    };
    assert_eq!(without_timestamp(&first.records), without_timestamp(&second.records));
}

#[tokio::test]
async fn test_no_url_fetched_twice() {
    let server = MockServer::start().await;
    let pages = [
        ("/", r#"<a href="/a">A</a><a href="/b">B</a><a href="/a#top">A again</a>"#),
        ("/a", r#"<a href="/">Home</a><a href="/b/">B</a><a href="/a?ref=x">A</a>"#),
        ("/b", r#"<a href="/a">A</a><a href="/">Home</a>"#),
    ];
    for (route, links) in pages {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html(format!("<html><body>{}</body></html>", links)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let outcome = run_crawl(create_test_config(&server.uri(), dir.path(), false), None)
        .await
        .unwrap();

    assert_eq!(outcome.records.len(), 3);
    assert!(outcome.summary.discovered_urls_not_crawled.is_empty());
    // Expectations are verified when the server drops
}

#[tokio::test]
async fn test_sitemap_urls_are_unioned_and_crawled() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("User-agent: *\nAllow: /\nSitemap: {}/extra.xml\n", base)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(format!(
            r#"<?xml version="1.0"?>
            <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <sitemap><loc>{0}/pages.xml</loc></sitemap>
                <sitemap><loc>{0}/sitemap.xml</loc></sitemap>
            </sitemapindex>"#,
            base
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pages.xml"))
        .respond_with(xml(format!(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <url><loc>{0}/one</loc></url>
                <url><loc>{0}/two</loc></url>
                <url><loc>https://elsewhere.example.net/three</loc></url>
            </urlset>"#,
            base
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/extra.xml"))
        .respond_with(xml(format!(
            r#"<urlset><url><loc>{0}/two</loc></url><url><loc>{0}/four</loc></url></urlset>"#,
            base
        )))
        .mount(&server)
        .await;

    mount_page(&server, "/", "<html><body><p>home</p></body></html>".to_string()).await;
    for route in ["/one", "/two", "/four"] {
        mount_page(&server, route, format!("<html><title>{}</title></html>", route)).await;
    }

    let dir = TempDir::new().unwrap();
    let outcome = run_crawl(create_test_config(&base, dir.path(), true), None)
        .await
        .unwrap();

    let expected: Vec<String> = [
        format!("{}/one", base),
        format!("{}/two", base),
        "https://elsewhere.example.net/three".to_string(),
        format!("{}/four", base),
    ]
    .to_vec();
    assert_eq!(outcome.sitemap.urls, expected);
    assert_eq!(outcome.sitemap.total_urls, 4);

    let crawled: Vec<&str> = outcome.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(crawled.len(), 4);
    assert!(crawled[0].ends_with('/'));
    assert!(crawled[1].ends_with("/one"));
    assert!(crawled[2].ends_with("/two"));
    assert!(crawled[3].ends_with("/four"));
    assert_eq!(outcome.summary.sitemap_urls_not_crawled.len(), 1);
}

/// Renders fixed markup and counts shutdown calls
struct CountingRenderer {
    shutdowns: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderStrategy for CountingRenderer {
    async fn render(&mut self, _url: &Url) -> Result<String, RenderError> {
        Ok("<html><head><title>Rendered</title></head><body><h1>Rendered</h1></body></html>"
            .to_string())
    }

    async fn shutdown(&mut self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_renderer_shut_down_when_crawl_fails() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "<html><body><div id=\"root\"></div></body></html>".to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    // A directory where the home page record should go makes the save fail
    std::fs::create_dir(dir.path().join("index.json")).unwrap();

    let mut config = create_test_config(&server.uri(), dir.path(), false);
    config.render.enabled = true;

    let shutdowns = Arc::new(AtomicUsize::new(0));
    let result = Coordinator::new(config, None)
        .unwrap()
        .with_renderer(Box::new(CountingRenderer {
            shutdowns: Arc::clone(&shutdowns),
        }))
        .run()
        .await;

    assert!(matches!(result, Err(GeoError::Storage(_))));
    assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    assert!(!dir.path().join(SUMMARY_ARTIFACT).exists());
}

#[tokio::test]
async fn test_request_delay_applies_after_failed_fetches() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><body><a href="/gone">Gone</a><a href="/also-gone">Also gone</a></body></html>"#
            .to_string(),
    )
    .await;
    for route in ["/gone", "/also-gone"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), dir.path(), false);
    config.crawler.request_delay_ms = 100;

    let start = Instant::now();
    let outcome = run_crawl(config, None).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.summary.outcomes.get(PageState::DeadLink), 2);
    // One delay per attempt, including the two 404s
    assert!(
        elapsed >= Duration::from_millis(300),
        "crawl finished in {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_scoring_skips_malformed_records() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();

    run_crawl(create_test_config(&server.uri(), dir.path(), false), None)
        .await
        .unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

    let loaded = JsonDirStore::open(dir.path()).load_pages().unwrap();
    assert_eq!(loaded.records.len(), 2);
    assert_eq!(loaded.skipped.len(), 1);

    let card = build_scorecard(&loaded.records);
    assert_eq!(card.total_pages, 2);
    assert!(card
        .pages
        .windows(2)
        .all(|w| w[0].scores.total <= w[1].scores.total));
    assert_eq!(card.pages[0].priority_rank, 1);
}

#[tokio::test]
async fn test_scoring_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let store = JsonDirStore::open(dir.path().join("does-not-exist"));
    assert!(store.load_pages().is_err());
}
