//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! full crawl cycle end-to-end: traversal, language filtering, persistence,
//! and master record aggregation.

use sitefold::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use sitefold::crawler::crawl;
use sitefold::fingerprint::fingerprint;
use sitefold::storage::{SqliteStorage, Storage};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Paragraphs long enough for reliable language detection
const ROOT_TEXT: &str = "The general assembly convened this morning to discuss the \
    worldwide response to rising sea levels, and delegates from many countries \
    presented detailed reports about the state of their coastal infrastructure.";

const CHILD_ONE_TEXT: &str = "The first working group published an extensive survey \
    of renewable energy adoption across member states, noting that wind and solar \
    capacity has grown steadily in every region over the past decade.";

const CHILD_TWO_TEXT: &str = "The second committee reviewed humanitarian funding \
    commitments and concluded that emergency relief programs will require broader \
    support from donor countries throughout the coming year.";

const FRENCH_TEXT: &str = "Le conseil s'est réuni ce matin pour discuter de la \
    réponse mondiale à la montée du niveau des mers, et les délégués de nombreux \
    pays ont présenté des rapports détaillés sur leurs infrastructures côtières.";

/// Creates a test configuration pointing at the given root URL and database
fn create_test_config(root_url: &str, depth: u32, db_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            root_url: root_url.to_string(),
            depth,
            max_concurrent_fetches: 4,
            target_language: "eng".to_string(),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
        },
    }
}

/// Builds a minimal HTML page from a body paragraph and a list of hrefs
fn html_page(paragraph: &str, hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        r#"<html><head><title>Test</title></head><body><p>{}</p>{}</body></html>"#,
        paragraph, links
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

struct TestDb {
    _dir: tempfile::TempDir,
    path: String,
}

fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir
        .path()
        .join("crawl.db")
        .to_string_lossy()
        .into_owned();
    TestDb { _dir: dir, path }
}

#[tokio::test]
async fn test_depth_zero_performs_no_fetch() {
    let mock_server = MockServer::start().await;

    // Any request at all would violate the depth-0 contract
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("never served"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let db = test_db();
    let root = format!("{}/", mock_server.uri());
    let config = create_test_config(&root, 0, &db.path);

    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.stats.total_sublinks, 0);
    assert_eq!(report.stats.fetched_sublinks, 0);
    assert_eq!(report.stats.error_count, 0);
    assert_eq!(report.stats.saved_count, 0);
    assert!(report.master.is_none());

    let storage = SqliteStorage::new(std::path::Path::new(&db.path)).expect("Failed to open DB");
    assert_eq!(storage.count_web_content().unwrap(), 0);
    assert_eq!(storage.count_master_records().unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    // The root links to itself and to the same child twice
    mount_page(
        &mock_server,
        "/",
        html_page(ROOT_TEXT, &["/", "/child", "/child"]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page(CHILD_ONE_TEXT, &[]))
                .insert_header("content-type", "text/html"),
        )
        .expect(1) // The visited set must collapse the duplicate
        .mount(&mock_server)
        .await;

    let db = test_db();
    let config = create_test_config(&root, 2, &db.path);
    let report = crawl(config).await.expect("Crawl failed");

    // The self-link is already visited at discovery time and never counted;
    // the duplicate child link is counted twice but fetched once
    assert_eq!(report.stats.total_sublinks, 2);
    assert_eq!(report.stats.fetched_sublinks, 2);
    assert_eq!(report.stats.error_count, 0);
    assert_eq!(report.stats.saved_count, 2);

    let master = report.master.expect("Master record should exist");
    assert_eq!(master.sublinks.len(), 2);
}

#[tokio::test]
async fn test_initial_depth_three_discovers_no_links() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    mount_page(&mock_server, "/", html_page(ROOT_TEXT, &["/child"])).await;

    // Discovery only fires when a node's depth is literally 2, so a crawl
    // started at depth 3 never follows anything
    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(CHILD_ONE_TEXT, &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let db = test_db();
    let config = create_test_config(&root, 3, &db.path);
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.stats.total_sublinks, 0);
    assert_eq!(report.stats.fetched_sublinks, 0);
    assert_eq!(report.stats.saved_count, 1);

    let master = report.master.expect("Master record should exist");
    assert_eq!(master.sublinks.len(), 1);
}

#[tokio::test]
async fn test_end_to_end_master_merge() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    mount_page(
        &mock_server,
        "/",
        html_page(ROOT_TEXT, &["/one", "/two"]),
    )
    .await;
    mount_page(&mock_server, "/one", html_page(CHILD_ONE_TEXT, &[])).await;
    mount_page(&mock_server, "/two", html_page(CHILD_TWO_TEXT, &[])).await;

    let db = test_db();
    let config = create_test_config(&root, 2, &db.path);
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.stats.total_sublinks, 2);
    assert_eq!(report.stats.fetched_sublinks, 2);
    assert_eq!(report.stats.error_count, 0);
    assert_eq!(report.stats.saved_count, 3);

    let master = report.master.expect("Master record should exist");
    assert_eq!(master.root_url, root);
    assert_eq!(master.sublinks.len(), 3);

    // The root's merge is enqueued before any child finishes
    assert_eq!(master.sublinks[0].url, root);
    assert!(master.merged_content.contains(ROOT_TEXT));
    assert!(master.merged_content.contains(CHILD_ONE_TEXT));
    assert!(master.merged_content.contains(CHILD_TWO_TEXT));

    // The record's hash follows the most recently merged page
    let last = master.sublinks.last().unwrap();
    assert_eq!(master.content_hash, last.content_hash);
    assert_eq!(master.content_hash, fingerprint(&last.content));

    // Everything landed in the database
    let storage = SqliteStorage::new(std::path::Path::new(&db.path)).expect("Failed to open DB");
    assert_eq!(storage.count_web_content().unwrap(), 3);
    let stored = storage
        .get_master_record(&root)
        .unwrap()
        .expect("Master record should be persisted");
    assert_eq!(stored.sublinks.len(), 3);
    assert_eq!(stored.merged_content, master.merged_content);
}

#[tokio::test]
async fn test_failed_child_fetch_is_counted_not_fatal() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    mount_page(
        &mock_server,
        "/",
        html_page(ROOT_TEXT, &["/good", "/broken"]),
    )
    .await;
    mount_page(&mock_server, "/good", html_page(CHILD_ONE_TEXT, &[])).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let db = test_db();
    let config = create_test_config(&root, 2, &db.path);
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.stats.error_count, 1);
    assert_eq!(report.stats.saved_count, 2);
    assert_eq!(report.stats.total_sublinks, 2);

    let master = report.master.expect("Master record should exist");
    assert_eq!(master.sublinks.len(), 2);
}

#[tokio::test]
async fn test_repeated_content_is_not_remerged() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    // The child serves the exact same paragraph as the root
    mount_page(&mock_server, "/", html_page(ROOT_TEXT, &["/mirror"])).await;
    mount_page(&mock_server, "/mirror", html_page(ROOT_TEXT, &[])).await;

    let db = test_db();
    let config = create_test_config(&root, 2, &db.path);
    let report = crawl(config).await.expect("Crawl failed");

    // Both pages are persisted individually, but the master only holds the
    // content once: the mirror's hash matches the record's current hash
    assert_eq!(report.stats.saved_count, 2);

    let master = report.master.expect("Master record should exist");
    assert_eq!(master.sublinks.len(), 1);
    assert_eq!(master.merged_content, ROOT_TEXT);

    let storage = SqliteStorage::new(std::path::Path::new(&db.path)).expect("Failed to open DB");
    assert_eq!(storage.count_web_content().unwrap(), 2);
}

#[tokio::test]
async fn test_filtered_out_page_still_discovers_links() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/", mock_server.uri());

    // The root page is entirely in the wrong language: nothing to persist,
    // but its links must still be followed
    mount_page(&mock_server, "/", html_page(FRENCH_TEXT, &["/child"])).await;
    mount_page(&mock_server, "/child", html_page(CHILD_ONE_TEXT, &[])).await;

    let db = test_db();
    let config = create_test_config(&root, 2, &db.path);
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.stats.saved_count, 1);
    assert_eq!(report.stats.total_sublinks, 1);

    // The first page that produced content created the master, but the
    // record is still keyed by the crawl root
    let master = report.master.expect("Master record should exist");
    assert_eq!(master.root_url, root);
    assert_eq!(master.sublinks.len(), 1);
    assert!(master.merged_content.contains(CHILD_ONE_TEXT));

    let storage = SqliteStorage::new(std::path::Path::new(&db.path)).expect("Failed to open DB");
    assert_eq!(storage.count_web_content().unwrap(), 1);
}
