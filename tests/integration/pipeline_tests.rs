//! Integration tests for the scraping pipeline
//!
//! These tests use wiremock to serve council blog listings and exercise the
//! walker, the coordinator, and the full load -> scrape -> merge -> persist run.

use council_feed::config::{
    Config, MarkupConfig, OutputConfig, ScraperConfig, SiteConfig, Source, UserAgentConfig,
};
use council_feed::crawler::{
    build_http_client, scrape, Coordinator, MarkupSchema, Pacing, SourceStatus, SourceWalker,
};
use council_feed::model::{parse_timestamp, Dataset, Post, RunMetadata};
use council_feed::storage::{DatasetStore, JsonStore};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn source(base_url: &str, district: u32) -> Source {
    Source {
        id: district,
        name: format!("District {} Member", district),
        blog_url: format!("{}/council/district{}/blog", base_url, district),
        avatar_url: None,
    }
}

/// Creates a test configuration for the given roster and dataset path
fn create_test_config(sources: Vec<Source>, dataset_path: &str) -> Config {
    Config {
        scraper: ScraperConfig {
            page_delay_ms: 0,
            source_delay_ms: 0,
            request_timeout_secs: 5,
            max_pages_per_source: 100,
        },
        user_agent: user_agent(),
        output: OutputConfig {
            dataset_path: dataset_path.to_string(),
            summary_path: None,
        },
        site: SiteConfig::default(),
        markup: MarkupConfig::default(),
        sources,
    }
}

/// One post card in the council listing markup
fn card(district: u32, slug: &str, date: &str) -> String {
    format!(
        r#"<li><div class="card-content">
            <h3 class="article-title"><a href="/council/district{d}/blog/{path}/{slug}">{slug} title</a></h3>
            <time datetime="{date}T09:00:00-06:00">{date}</time>
            <div class="article-content">About {slug}.</div>
            <p><a href="/tags/news">News</a></p>
        </div></li>"#,
        d = district,
        path = date.replace('-', "/"),
        slug = slug,
        date = date
    )
}

/// A card whose title link is missing
fn broken_card(date: &str) -> String {
    format!(
        r#"<li><div class="card-content">
            <h3 class="article-title">No link</h3>
            <time datetime="{}T09:00:00Z"></time>
        </div></li>"#,
        date
    )
}

/// A full listing page, optionally with a pager whose last link points at `last_page`
fn listing(cards: &[String], last_page: Option<u32>) -> String {
    let pager = match last_page {
        Some(last) => format!(
            r#"<nav class="pager"><ul>
                <li class="pager__item"><a href="?page=1">Next</a></li>
                <li class="pager__item pager__item--last"><a href="?page={}">Last</a></li>
            </ul></nav>"#,
            last
        ),
        None => String::new(),
    };

    format!(
        r#"<html><head><title>Blog</title></head><body>
        <div id="block-city-front-content">
            <div class="content-blog-summary"><ul class="cards">{}</ul></div>
            {}
        </div></body></html>"#,
        cards.join("\n"),
        pager
    )
}

fn blog_path(district: u32) -> String {
    format!("/council/district{}/blog", district)
}

/// Mounts a later page; must be mounted before the first-page mock
async fn mount_page(server: &MockServer, district: u32, page: u32, response: ResponseTemplate, expected: u64) {
    Mock::given(method("GET"))
        .and(path(blog_path(district)))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

/// Mounts the first page (matches any query not claimed by an earlier mock)
async fn mount_first_page(server: &MockServer, district: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(blog_path(district)))
        .respond_with(response)
        .mount(server)
        .await;
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn titles(posts: &[Post]) -> Vec<String> {
    posts.iter().map(|p| p.title.clone()).collect()
}

#[tokio::test]
async fn test_single_page_without_pager() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, 1, 1, html(listing(&[], None)), 0).await;
    mount_first_page(
        &mock_server,
        1,
        html(listing(
            &[
                card(1, "alpha", "2026-01-15"),
                card(1, "beta", "2026-01-10"),
            ],
            None,
        )),
    )
    .await;

    let client = build_http_client(&user_agent(), Duration::from_secs(5)).unwrap();
    let schema = MarkupSchema::from_config(&MarkupConfig::default()).unwrap();
    let site = SiteConfig::default();
    let walker = SourceWalker::new(&client, &schema, &site, Pacing::none(), 100);

    let report = walker.walk(&source(&base_url, 1)).await;

    assert_eq!(report.status, SourceStatus::Completed);
    assert_eq!(report.pages_total, 1);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(titles(&report.posts), vec!["alpha title", "beta title"]);

    let first = &report.posts[0];
    assert_eq!(first.id, "district1-2026-01-15-alpha");
    assert_eq!(
        first.permalink,
        format!("{}/council/district1/blog/2026/01/15/alpha", base_url)
    );
    assert_eq!(first.categories, vec!["News"]);
    assert_eq!(first.body_preview, "About alpha.");
}

#[tokio::test]
async fn test_pager_last_index_four_fetches_pages_one_through_four() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for page in 1..=4 {
        let slug = format!("page{}", page);
        let date = format!("2026-01-0{}", page);
        mount_page(
            &mock_server,
            2,
            page,
            html(listing(&[card(2, &slug, &date)], Some(4))),
            1,
        )
        .await;
    }
    mount_page(&mock_server, 2, 5, html(listing(&[], Some(4))), 0).await;
    mount_first_page(
        &mock_server,
        2,
        html(listing(&[card(2, "page0", "2026-01-09")], Some(4))),
    )
    .await;

    let client = build_http_client(&user_agent(), Duration::from_secs(5)).unwrap();
    let schema = MarkupSchema::from_config(&MarkupConfig::default()).unwrap();
    let site = SiteConfig::default();
    let walker = SourceWalker::new(&client, &schema, &site, Pacing::none(), 100);

    let report = walker.walk(&source(&base_url, 2)).await;

    assert_eq!(report.pages_total, 5);
    assert_eq!(report.pages_fetched, 5);
    assert!(report.failed_pages.is_empty());
    assert_eq!(
        titles(&report.posts),
        vec![
            "page0 title",
            "page1 title",
            "page2 title",
            "page3 title",
            "page4 title"
        ]
    );
}

#[tokio::test]
async fn test_page_cap_limits_walk() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, 3, 1, html(listing(&[card(3, "one", "2026-01-01")], Some(99))), 1).await;
    mount_page(&mock_server, 3, 2, html(listing(&[], Some(99))), 0).await;
    mount_first_page(
        &mock_server,
        3,
        html(listing(&[card(3, "zero", "2026-01-02")], Some(99))),
    )
    .await;

    let client = build_http_client(&user_agent(), Duration::from_secs(5)).unwrap();
    let schema = MarkupSchema::from_config(&MarkupConfig::default()).unwrap();
    let site = SiteConfig::default();
    let walker = SourceWalker::new(&client, &schema, &site, Pacing::none(), 2);

    let report = walker.walk(&source(&base_url, 3)).await;

    assert_eq!(report.pages_total, 2);
    assert_eq!(report.posts.len(), 2);
}

#[tokio::test]
async fn test_failed_later_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, 4, 1, html(listing(&[card(4, "b", "2026-01-02")], Some(3))), 1).await;
    mount_page(&mock_server, 4, 2, ResponseTemplate::new(500), 1).await;
    mount_page(&mock_server, 4, 3, html(listing(&[card(4, "d", "2026-01-04")], Some(3))), 1).await;
    mount_first_page(
        &mock_server,
        4,
        html(listing(&[card(4, "a", "2026-01-01")], Some(3))),
    )
    .await;

    let client = build_http_client(&user_agent(), Duration::from_secs(5)).unwrap();
    let schema = MarkupSchema::from_config(&MarkupConfig::default()).unwrap();
    let site = SiteConfig::default();
    let walker = SourceWalker::new(&client, &schema, &site, Pacing::none(), 100);

    let report = walker.walk(&source(&base_url, 4)).await;

    assert_eq!(report.status, SourceStatus::Completed);
    assert_eq!(report.pages_total, 4);
    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.failed_pages.len(), 1);
    assert_eq!(report.failed_pages[0].page, 2);
    assert_eq!(report.failed_pages[0].status_code, Some(500));
    assert_eq!(titles(&report.posts), vec!["a title", "b title", "d title"]);
}

#[tokio::test]
async fn test_first_page_failure_fails_source() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, 5, 1, html(listing(&[], None)), 0).await;
    mount_first_page(&mock_server, 5, ResponseTemplate::new(404)).await;

    let client = build_http_client(&user_agent(), Duration::from_secs(5)).unwrap();
    let schema = MarkupSchema::from_config(&MarkupConfig::default()).unwrap();
    let site = SiteConfig::default();
    let walker = SourceWalker::new(&client, &schema, &site, Pacing::none(), 100);

    let report = walker.walk(&source(&base_url, 5)).await;

    assert!(report.is_failed());
    assert!(report.posts.is_empty());
    assert_eq!(report.pages_fetched, 0);
}

#[tokio::test]
async fn test_malformed_card_dropped_others_kept() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_first_page(
        &mock_server,
        6,
        html(listing(
            &[
                card(6, "first", "2026-01-03"),
                broken_card("2026-01-02"),
                card(6, "third", "2026-01-01"),
            ],
            None,
        )),
    )
    .await;

    let client = build_http_client(&user_agent(), Duration::from_secs(5)).unwrap();
    let schema = MarkupSchema::from_config(&MarkupConfig::default()).unwrap();
    let site = SiteConfig::default();
    let walker = SourceWalker::new(&client, &schema, &site, Pacing::none(), 100);

    let report = walker.walk(&source(&base_url, 6)).await;

    assert_eq!(report.posts.len(), 2);
    assert_eq!(report.rejected_cards, 1);
    assert_eq!(titles(&report.posts), vec!["first title", "third title"]);
}

#[tokio::test]
async fn test_scrape_all_collects_failed_sources() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_first_page(&mock_server, 1, html(listing(&[card(1, "one", "2026-01-05")], None))).await;
    mount_first_page(&mock_server, 2, ResponseTemplate::new(503)).await;
    mount_first_page(&mock_server, 3, html(listing(&[], None))).await;

    let config = create_test_config(
        vec![
            source(&base_url, 1),
            source(&base_url, 2),
            source(&base_url, 3),
        ],
        "unused.json",
    );
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_pacing(Pacing::none());

    let result = coordinator.scrape_all().await;

    assert_eq!(result.posts.len(), 1);
    assert_eq!(result.failed_sources, vec![2, 3]);
    assert_eq!(result.reports.len(), 3);
    assert!(result.reports[1].is_failed());
    assert!(!result.reports[2].is_failed());
}

#[tokio::test]
async fn test_full_run_persists_and_is_idempotent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        1,
        1,
        html(listing(&[card(1, "older", "2026-01-10")], Some(1))),
        2,
    )
    .await;
    mount_first_page(
        &mock_server,
        1,
        html(listing(
            &[card(1, "recent", "2026-01-25"), card(1, "same-day", "2026-01-10")],
            Some(1),
        )),
    )
    .await;
    mount_first_page(&mock_server, 2, ResponseTemplate::new(500)).await;

    let dir = TempDir::new().unwrap();
    let dataset_path = dir.path().join("data").join("posts.json");
    let store = JsonStore::new(&dataset_path);

    let config = create_test_config(
        vec![source(&base_url, 1), source(&base_url, 2)],
        &dataset_path.display().to_string(),
    );
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_pacing(Pacing::none());

    // First run: everything is new
    let summary = coordinator.run(&store).await.expect("Run failed");
    assert_eq!(summary.metadata.new_posts, 3);
    assert_eq!(summary.metadata.total_posts, 3);
    assert_eq!(summary.metadata.failed_sources, vec![2]);

    let dataset = store.load().unwrap();
    assert_eq!(
        titles(&dataset.posts),
        vec!["recent title", "same-day title", "older title"]
    );
    assert_eq!(dataset.metadata.as_ref().unwrap().failed_sources, vec![2]);

    // Second run: nothing new, nothing lost
    let summary = coordinator.run(&store).await.expect("Second run failed");
    assert_eq!(summary.metadata.new_posts, 0);
    assert_eq!(summary.metadata.total_posts, 3);
    assert_eq!(summary.duplicates, 3);
    assert_eq!(store.load().unwrap().posts, dataset.posts);
}

#[tokio::test]
async fn test_stored_posts_are_never_rewritten() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_first_page(
        &mock_server,
        7,
        html(listing(
            &[card(7, "edited", "2026-01-20"), card(7, "fresh", "2026-01-21")],
            None,
        )),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path().join("posts.json"));

    let stored = Post {
        id: "district7-2026-01-20-edited".to_string(),
        source_id: 7,
        title: "Original title".to_string(),
        permalink: format!("{}/council/district7/blog/2026/01/20/edited", base_url),
        published: parse_timestamp("2026-01-20T09:00:00-06:00").unwrap(),
        body_preview: "Original body".to_string(),
        categories: Vec::new(),
        scraped_at: "2026-01-20T18:00:00Z".parse().unwrap(),
    };
    store
        .save(&Dataset {
            posts: vec![stored.clone()],
            metadata: Some(RunMetadata {
                total_posts: 1,
                new_posts: 1,
                failed_sources: Vec::new(),
                completed_at: "2026-01-20T18:00:00Z".parse().unwrap(),
            }),
        })
        .unwrap();

    let config = create_test_config(
        vec![source(&base_url, 7)],
        &store.path().display().to_string(),
    );
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_pacing(Pacing::none());

    let summary = coordinator.run(&store).await.expect("Run failed");
    assert_eq!(summary.metadata.new_posts, 1);
    assert_eq!(summary.metadata.total_posts, 2);

    let dataset = store.load().unwrap();
    assert_eq!(titles(&dataset.posts), vec!["fresh title", "Original title"]);
    assert_eq!(dataset.posts[1], stored);
}

#[tokio::test]
async fn test_corrupt_dataset_treated_as_empty() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_first_page(&mock_server, 8, html(listing(&[card(8, "only", "2026-01-01")], None))).await;

    let dir = TempDir::new().unwrap();
    let dataset_path = dir.path().join("posts.json");
    std::fs::write(&dataset_path, "{ truncated").unwrap();
    let store = JsonStore::new(&dataset_path);

    let config = create_test_config(
        vec![source(&base_url, 8)],
        &dataset_path.display().to_string(),
    );
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_pacing(Pacing::none());

    let summary = coordinator.run(&store).await.expect("Run failed");
    assert_eq!(summary.previous_posts, 0);
    assert_eq!(store.load().unwrap().posts.len(), 1);

    // The unreadable file is kept beside the new dataset, not overwritten
    let kept: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|p| {
            p.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("posts.json.corrupt-")
        })
        .collect();
    assert_eq!(kept.len(), 1);
    assert_eq!(std::fs::read_to_string(&kept[0]).unwrap(), "{ truncated");
}

#[tokio::test]
async fn test_legacy_dates_keep_stored_history() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_first_page(&mock_server, 10, html(listing(&[card(10, "new", "2026-02-01")], None))).await;

    let dir = TempDir::new().unwrap();
    let dataset_path = dir.path().join("posts.json");
    std::fs::write(
        &dataset_path,
        r#"{
            "posts": [
                {
                    "id": "district10-2026-01-15-a",
                    "alderId": 10,
                    "title": "A",
                    "url": "https://example.org/council/district10/blog/2026/01/15/a",
                    "date": "2026-01-15T12:00:00.000",
                    "bodyPreview": "",
                    "categories": [],
                    "scrapedAt": "2026-01-16T00:00:00.000Z"
                },
                {
                    "id": "district10-2026-01-10-b",
                    "alderId": 10,
                    "title": "B",
                    "url": "https://example.org/council/district10/blog/2026/01/10/b",
                    "date": "2026-01-10T09:00:00-06:00",
                    "bodyPreview": "",
                    "categories": [],
                    "scrapedAt": "2026-01-16T00:00:00.000Z"
                }
            ],
            "metadata": {
                "totalPosts": 2,
                "newPosts": 2,
                "failedDistricts": [],
                "lastScrapedAt": "2026-01-16T00:00:00.000Z"
            }
        }"#,
    )
    .unwrap();
    let store = JsonStore::new(&dataset_path);

    let config = create_test_config(
        vec![source(&base_url, 10)],
        &dataset_path.display().to_string(),
    );
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_pacing(Pacing::none());

    let summary = coordinator.run(&store).await.expect("Run failed");
    assert_eq!(summary.previous_posts, 2);
    assert_eq!(summary.metadata.new_posts, 1);
    assert_eq!(summary.metadata.total_posts, 3);
    assert_eq!(
        titles(&store.load().unwrap().posts),
        vec!["new title", "A", "B"]
    );
}

#[tokio::test]
async fn test_unwritable_summary_does_not_fail_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_first_page(&mock_server, 11, html(listing(&[card(11, "post", "2026-01-01")], None))).await;

    let dir = TempDir::new().unwrap();
    let dataset_path = dir.path().join("posts.json");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();

    let mut config = create_test_config(
        vec![source(&base_url, 11)],
        &dataset_path.display().to_string(),
    );
    config.output.summary_path = Some(blocker.join("last-run.md").display().to_string());

    let summary = scrape(config).await.expect("Run should succeed");
    assert_eq!(summary.metadata.total_posts, 1);
    assert_eq!(JsonStore::new(&dataset_path).load().unwrap().posts.len(), 1);
}

#[tokio::test]
async fn test_run_waits_between_pages_and_sources() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for page in 1..=2 {
        let slug = format!("p{}", page);
        mount_page(
            &mock_server,
            12,
            page,
            html(listing(&[card(12, &slug, "2026-01-02")], Some(2))),
            1,
        )
        .await;
    }
    mount_first_page(&mock_server, 12, html(listing(&[card(12, "p0", "2026-01-03")], Some(2)))).await;
    mount_first_page(&mock_server, 13, html(listing(&[card(13, "solo", "2026-01-04")], None))).await;

    let page_delay = Duration::from_millis(50);
    let source_delay = Duration::from_millis(80);
    let config = create_test_config(
        vec![source(&base_url, 12), source(&base_url, 13)],
        "unused.json",
    );
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_pacing(Pacing::new(page_delay, source_delay));

    let started = Instant::now();
    let result = coordinator.scrape_all().await;
    let elapsed = started.elapsed();

    assert_eq!(result.posts.len(), 4);
    // Two later pages of the first source, one gap before the second source
    assert!(
        elapsed >= page_delay * 2 + source_delay,
        "run took only {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_no_wait_before_first_page_or_first_source() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_first_page(&mock_server, 14, html(listing(&[card(14, "only", "2026-01-01")], None))).await;

    let delay = Duration::from_millis(500);
    let config = create_test_config(vec![source(&base_url, 14)], "unused.json");
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_pacing(Pacing::new(delay, delay));

    let started = Instant::now();
    let result = coordinator.scrape_all().await;
    let elapsed = started.elapsed();

    assert_eq!(result.posts.len(), 1);
    assert!(elapsed < delay, "single-page run took {:?}", elapsed);
}

#[tokio::test]
async fn test_unwritable_dataset_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_first_page(&mock_server, 9, html(listing(&[card(9, "post", "2026-01-01")], None))).await;

    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();
    let store = JsonStore::new(blocker.join("posts.json"));

    let config = create_test_config(
        vec![source(&base_url, 9)],
        &store.path().display().to_string(),
    );
    let coordinator = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_pacing(Pacing::none());

    assert!(coordinator.run(&store).await.is_err());
}
