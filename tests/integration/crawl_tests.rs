//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end: config parsing, fetching, storage,
//! asset downloads and the JSON report.

use site_harvest::config::{parse_config, CrawlSettings};
use site_harvest::crawler::Engine;
use site_harvest::RunState;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds settings for a crawl of `base_url`, writing below `root`
fn create_test_settings(base_url: &str, root: &Path, extra: &str) -> CrawlSettings {
    let toml = format!(
        r#"
[crawler]
base-url = '{base_url}'
request-timeout = 5

[output]
output-dir = '{out}'
report-path = '{report}'

{extra}
"#,
        out = root.join("out").display(),
        report = root.join("out/report.json").display(),
    );

    let config = parse_config(&toml).expect("valid test config");
    CrawlSettings::from_config(&config).expect("valid test settings")
}

async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn read_report(root: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(root.join("out/report.json")).expect("report written");
    serde_json::from_str(&raw).expect("report is JSON")
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home</title></head><body><main>
            <a href="/page1">Page 1</a>
            <a href="page2#section">Page 2</a>
            <a href="/en/page1">English</a>
            <a href="https://other.example/x">Elsewhere</a>
            <a href="javascript:void(0)">Menu</a>
        </main></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/page1",
        r#"<html><head><title>Page 1</title></head><body>
            <a href="/">Home</a><a href="/page2?ref=1">Page 2</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/page2",
        "<html><head><title>Page 2</title></head><body><article>Leaf</article></body></html>",
    )
    .await;

    let settings = create_test_settings(&server.uri(), tmp.path(), "");
    let engine = Engine::from_settings(settings).await.unwrap();
    let outcome = engine.run().await.unwrap();

    assert_eq!(outcome.state, RunState::Completed);
    assert_eq!(outcome.total_urls(), 3);
    assert_eq!(outcome.stats.successful, 3);
    assert_eq!(outcome.stats.failed, 0);
    assert_eq!(outcome.stats.filtered, 2);
    assert_eq!(outcome.pages.len(), 3);

    // Documents laid out after the URL path
    let out = tmp.path().join("out");
    assert!(out.join("index.html").is_file());
    assert!(out.join("page1.html").is_file());
    assert!(out.join("page2.html").is_file());

    let report = read_report(tmp.path());
    assert_eq!(report["stats"]["total_urls"], 3);
    assert_eq!(report["stats"]["successful_scrapes"], 3);
    assert_eq!(report["stats"]["failed_scrapes"], 0);
    assert_eq!(report["stats"]["filtered_urls"], 2);
    assert!(report["stats"].get("downloaded_css").is_none());
    assert!(report["stats"].get("downloaded_js").is_none());

    let pages = report["scraped_data"].as_array().unwrap();
    assert_eq!(pages.len(), 3);
    let leaf = pages
        .iter()
        .find(|p| p["title"] == "Page 2")
        .expect("page2 scraped");
    assert_eq!(leaf["url"], format!("{}/page2", server.uri()));
    assert_eq!(leaf["content_snippet"], "Leaf");
    assert!(leaf["html_file"].as_str().unwrap().ends_with("page2.html"));
    assert_eq!(leaf["downloaded_images"], serde_json::json!([]));
}

#[tokio::test]
async fn test_seed_failure_recorded() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let settings = create_test_settings(&server.uri(), tmp.path(), "");
    let engine = Engine::from_settings(settings).await.unwrap();
    let outcome = engine.run().await.unwrap();

    assert_eq!(outcome.state, RunState::Completed);
    assert_eq!(outcome.total_urls(), 1);
    assert_eq!(outcome.stats.successful, 0);
    assert_eq!(outcome.stats.failed, 1);
    assert!(outcome.pages.is_empty());

    let report = read_report(tmp.path());
    assert_eq!(report["stats"]["failed_scrapes"], 1);
    assert_eq!(report["scraped_data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_assets_downloaded() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<html><head>
            <title>Gallery</title>
            <link rel="stylesheet" href="/static/site.css">
            <script src="/static/app.js"></script>
        </head><body>
            <img src="/img/logo.png">
            <img src="/img/missing.png">
        </body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/static/site.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body { color: red; }"))
        .mount(&server)
        .await;

    let settings = create_test_settings(
        &server.uri(),
        tmp.path(),
        "[assets]\ndownload-images = true\ndownload-css = true\n",
    );
    let engine = Engine::from_settings(settings).await.unwrap();
    let outcome = engine.run().await.unwrap();

    assert_eq!(outcome.state, RunState::Completed);
    assert_eq!(outcome.stats.images_downloaded, 1);
    assert_eq!(outcome.stats.css_downloaded, 1);
    assert_eq!(outcome.stats.js_downloaded, 0);

    let logo = tmp.path().join("out/images/index/logo.png");
    assert_eq!(std::fs::read(&logo).unwrap(), vec![0x89, 0x50, 0x4e, 0x47]);
    let css = tmp.path().join("out/css/index/site.css");
    assert_eq!(std::fs::read_to_string(&css).unwrap(), "body { color: red; }");

    let report = read_report(tmp.path());
    assert_eq!(report["stats"]["downloaded_images"], 1);
    assert_eq!(report["stats"]["downloaded_css"], 1);
    assert!(report["stats"].get("downloaded_js").is_none());

    let page = &report["scraped_data"][0];
    assert_eq!(page["downloaded_images"].as_array().unwrap().len(), 1);
    assert_eq!(page["downloaded_css"].as_array().unwrap().len(), 1);
    assert!(page.get("downloaded_js").is_none());
}

#[tokio::test]
async fn test_include_and_exclude_patterns() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<html><body>
            <a href="/blog/one">One</a>
            <a href="/blog/draft-two">Draft</a>
            <a href="/about">About</a>
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/blog/one", "<html><body>One</body></html>").await;

    let settings = create_test_settings(
        &server.uri(),
        tmp.path(),
        "[filters]\ninclude-patterns = ['/blog/']\nexclude-patterns = ['draft']\n",
    );
    let engine = Engine::from_settings(settings).await.unwrap();
    let outcome = engine.run().await.unwrap();

    assert_eq!(outcome.total_urls(), 2);
    assert_eq!(outcome.stats.successful, 2);
    assert_eq!(outcome.stats.filtered, 2);
    assert!(outcome
        .frontier
        .visited()
        .contains(&format!("{}/blog/one", server.uri())));
    assert!(outcome
        .frontier
        .skipped()
        .contains(&format!("{}/about", server.uri())));
}

#[tokio::test]
async fn test_stop_from_another_task() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><a href="/a">A</a><a href="/b">B</a></body></html>"#)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let settings = create_test_settings(&server.uri(), tmp.path(), "");
    let engine = Engine::from_settings(settings).await.unwrap();

    let stop = engine.stop_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        stop.request_stop();
    });

    let outcome = engine.run().await.unwrap();

    assert_eq!(outcome.state, RunState::Stopped);
    assert_eq!(outcome.total_urls(), 1);
    assert_eq!(outcome.pages.len(), 1);
    assert_eq!(outcome.frontier.queued_count(), 2);

    // Partial results still reach the report
    let report = read_report(tmp.path());
    assert_eq!(report["stats"]["total_urls"], 1);
}

#[tokio::test]
async fn test_unwritable_report_fails_run() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    mount_page(&server, "/", "<html><body>Only page</body></html>").await;

    let mut settings = create_test_settings(&server.uri(), tmp.path(), "");
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    settings.report_path = Some(blocker.join("report.json"));

    let engine = Engine::from_settings(settings).await.unwrap();
    let outcome = engine.run().await.unwrap();

    assert_eq!(outcome.state, RunState::Failed);
    assert_eq!(engine.state(), RunState::Failed);
    assert!(outcome.failure.is_some());
    assert_eq!(outcome.stats.successful, 1);
}
