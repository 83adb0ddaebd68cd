//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end. The crawler owns its own worker pool, so
//! each test drives the mock server from a separate runtime and calls
//! `crawl` from the plain test thread.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tally_crawl::config::{load_config, UserAgentConfig};
use tally_crawl::crawler::{CrawlOptions, CrawlResult, ParallelCrawler};
use tally_crawl::page::{build_http_client, HtmlPageParser, PageParser};
use tally_crawl::pattern::PatternSet;
use tally_crawl::profiler::Profiler;
use tempfile::{tempdir, NamedTempFile};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves `body` as HTML at `page`, expecting exactly `hits` requests
async fn mount_page(server: &MockServer, page: &str, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .expect(hits)
        .mount(server)
        .await;
}

/// Builds a small site:
///
/// ```text
/// /  -> /a, /b, /private/x, /missing
/// /a -> /, /b
/// /b -> /c
/// ```
fn start_site(rt: &Runtime) -> MockServer {
    rt.block_on(async {
        let server = MockServer::start().await;

        mount_page(
            &server,
            "/",
            r#"<html><head><title>Home</title></head><body>
            <p>The crawler counts words. Crawler!</p>
            <a href="/a">A</a>
            <a href="/b">B</a>
            <a href="/private/x">Private</a>
            <a href="/missing">Missing</a>
            </body></html>"#,
            1,
        )
        .await;

        mount_page(
            &server,
            "/a",
            r#"<html><body>apple crawler <a href="/">home</a> <a href="/b">b</a></body></html>"#,
            1,
        )
        .await;

        mount_page(
            &server,
            "/b",
            r#"<html><body>banana <a href="/c">c</a></body></html>"#,
            1,
        )
        .await;

        // Beyond the depth budget
        mount_page(&server, "/c", r#"<html><body>cherry</body></html>"#, 0).await;

        // Ignored by URL pattern
        mount_page(&server, "/private/x", r#"<html><body>secret</body></html>"#, 0).await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        server
    })
}

fn word_map(result: &CrawlResult) -> HashMap<String, u64> {
    result.word_counts.iter().cloned().collect()
}

fn create_temp_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_full_crawl_from_config() {
    let rt = Runtime::new().unwrap();
    let server = start_site(&rt);

    let config_file = create_temp_config(&format!(
        r#"
[crawler]
start-pages = ["{}/"]
max-depth = 2
timeout-seconds = 30
popular-word-count = 2
parallelism = 4
ignored-urls = [".*/private/.*"]
ignored-words = ["the"]

[parser]
page-timeout-seconds = 5

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
"#,
        server.uri()
    ));

    let config = load_config(config_file.path()).expect("Failed to load config");

    let profiler = Profiler::new();
    let parser = profiler.wrap(HtmlPageParser::from_config(&config).expect("Failed to build parser"));
    let options = CrawlOptions::from_config(&config).expect("Failed to build options");
    let crawler = ParallelCrawler::new(Arc::new(parser), options).expect("Failed to create crawler");

    let result = crawler.crawl(&config.crawler.start_pages);

    // "/", "/a", "/b" and the failed "/missing"
    assert_eq!(result.urls_visited, 4);
    // Link text counts too: "b" appears on "/" and "/a"
    assert_eq!(
        result.word_counts,
        vec![("crawler".to_string(), 3), ("b".to_string(), 2)]
    );

    // Every fetch went through the profiled parser, failures included
    let entry = profiler
        .state()
        .get_for::<HtmlPageParser>("parse")
        .expect("parse was not profiled");
    assert_eq!(entry.calls, 4);

    // Each page was requested exactly as often as expected
    rt.block_on(server.verify());
}

#[test]
fn test_word_totals_across_pages() {
    let rt = Runtime::new().unwrap();
    let server = start_site(&rt);

    let client = build_http_client(&UserAgentConfig::default()).unwrap();
    let parser = HtmlPageParser::new(client, Duration::from_secs(5), PatternSet::default());
    let options = CrawlOptions {
        timeout: Duration::from_secs(30),
        max_depth: 2,
        popular_word_count: 100,
        parallelism: 2,
        ignored_urls: PatternSet::compile(&[".*/private/.*".to_string()]).unwrap(),
    };
    let crawler = ParallelCrawler::new(Arc::new(parser), options).unwrap();

    let result = crawler.crawl(&[format!("{}/", server.uri())]);
    let words = word_map(&result);

    assert_eq!(words["the"], 1);
    assert_eq!(words["crawler"], 3);
    assert_eq!(words["counts"], 1);
    assert_eq!(words["words"], 1);
    assert_eq!(words["apple"], 1);
    assert_eq!(words["banana"], 1);
    // Link text is body text too
    assert_eq!(words["home"], 1);
    assert!(!words.contains_key("cherry"));
    assert!(!words.contains_key("secret"));
}

#[test]
fn test_slow_page_times_out_without_failing_crawl() {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(async {
        let server = MockServer::start().await;

        mount_page(
            &server,
            "/",
            r#"<html><body>root <a href="/slow">slow</a> <a href="/fast">fast</a></body></html>"#,
            1,
        )
        .await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body>late</body></html>", "text/html")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        mount_page(&server, "/fast", r#"<html><body>quick</body></html>"#, 1).await;

        server
    });

    let client = build_http_client(&UserAgentConfig::default()).unwrap();
    let parser = HtmlPageParser::new(client, Duration::from_millis(300), PatternSet::default());
    let options = CrawlOptions {
        timeout: Duration::from_secs(30),
        max_depth: 3,
        popular_word_count: 100,
        parallelism: 4,
        ignored_urls: PatternSet::default(),
    };
    let crawler = ParallelCrawler::new(Arc::new(parser), options).unwrap();

    let result = crawler.crawl(&[format!("{}/", server.uri())]);
    let words = word_map(&result);

    assert_eq!(result.urls_visited, 3);
    assert_eq!(words["root"], 1);
    assert_eq!(words["quick"], 1);
    assert!(!words.contains_key("late"));
}

#[test]
fn test_crawl_local_files() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("index.html"),
        r#"<html><body>local index <a href="one.html">one</a> <a href="two.html">two</a></body></html>"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("one.html"),
        r#"<html><body>local page <a href="index.html">back</a></body></html>"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("two.html"),
        r#"<html><body>local page</body></html>"#,
    )
    .unwrap();

    let seed = url::Url::from_file_path(dir.path().join("index.html"))
        .unwrap()
        .to_string();

    let profiler = Profiler::new();
    let client = build_http_client(&UserAgentConfig::default()).unwrap();
    let parser: Arc<dyn PageParser> = Arc::new(profiler.wrap(HtmlPageParser::new(
        client,
        Duration::from_secs(5),
        PatternSet::default(),
    )));
    let options = CrawlOptions {
        timeout: Duration::from_secs(30),
        max_depth: 5,
        popular_word_count: 1,
        parallelism: 2,
        ignored_urls: PatternSet::default(),
    };
    let crawler = ParallelCrawler::new(parser, options).unwrap();

    let first = crawler.crawl(&[seed.clone()]);
    assert_eq!(first.urls_visited, 3);
    assert_eq!(first.word_counts, vec![("local".to_string(), 3)]);

    // Each crawl starts from fresh state, so a rerun gives the same answer
    let second = crawler.crawl(&[seed]);
    assert_eq!(first, second);

    let mut report = Vec::new();
    profiler.write_report(&mut report).unwrap();
    let report = String::from_utf8(report).unwrap();
    assert!(report.contains("HtmlPageParser#parse"));
    assert!(report.contains("(6 calls)"));
}
