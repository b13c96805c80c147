use super::*;
use crate::config::{ApiConfig, DownloadConfig, RetryConfig};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, dir: &TempDir, max_retries: u32) -> Config {
    Config {
        api: ApiConfig {
            base_url: server.uri(),
            ..ApiConfig::default()
        },
        download: DownloadConfig {
            download_dir: dir.path().to_path_buf(),
            ..DownloadConfig::default()
        },
        retry: RetryConfig {
            max_retries,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            backoff_multiplier: 2.0,
            jitter: false,
        },
    }
}

/// Build a listings response whose photo URLs point back at the mock server
fn houses_json(server: &MockServer, houses: &[(i64, &str, &str)]) -> String {
    let houses: Vec<_> = houses
        .iter()
        .map(|(id, address, photo_path)| {
            serde_json::json!({
                "id": id,
                "address": address,
                "photoURL": format!("{}{}", server.uri(), photo_path),
            })
        })
        .collect();
    serde_json::json!({ "houses": houses }).to_string()
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/houses"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_photo(server: &MockServer, photo_path: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(photo_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}

async fn requests_to(server: &MockServer, path_str: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == path_str)
        .count()
}

#[tokio::test]
async fn first_attempt_success_downloads_every_photo() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let body = houses_json(
        &server,
        &[
            (30, "30 Maple Dr", "/photos/30.jpg"),
            (31, "31 Maple Dr", "/photos/31.png"),
        ],
    );
    mount_page(&server, 3, body).await;
    mount_photo(&server, "/photos/30.jpg", b"photo thirty").await;
    mount_photo(&server, "/photos/31.png", b"photo thirty-one").await;

    let fetcher = PageFetcher::new(test_config(&server, &dir, 1)).unwrap();
    let report = fetcher.fetch_page(3).await;

    assert!(report.is_success());
    assert_eq!(report.attempts, 1);
    assert_eq!(report.downloaded, 2);
    assert_eq!(report.skipped, 0);

    let thirty = std::fs::read(dir.path().join("id-30-30 Maple Dr.jpg")).unwrap();
    assert_eq!(thirty, b"photo thirty");
    assert!(dir.path().join("id-31-31 Maple Dr.png").exists());
}

#[tokio::test]
async fn empty_page_is_a_trivial_success() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, 1, r#"{ "houses": [] }"#.to_string()).await;

    let fetcher = PageFetcher::new(test_config(&server, &dir, 3)).unwrap();
    let report = fetcher.fetch_page(1).await;

    assert!(report.is_success());
    assert_eq!(report.attempts, 1);
    assert_eq!(report.downloaded, 0);
    assert_eq!(requests_to(&server, "/houses").await, 1);
}

#[tokio::test]
async fn worst_case_attempts_is_retries_plus_one() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/houses"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(test_config(&server, &dir, 2)).unwrap();
    let report = fetcher.fetch_page(9).await;

    assert!(!report.is_success());
    assert_eq!(report.attempts, 3, "2 retries means 3 attempts total");
    assert_eq!(requests_to(&server, "/houses").await, 3);
    match &report.outcome {
        PageOutcome::Failed { reason } => assert!(reason.contains("HTTP 500"), "got: {reason}"),
        PageOutcome::Complete => panic!("page should have failed"),
    }
}

#[tokio::test]
async fn zero_retries_means_exactly_one_attempt() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/houses"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(test_config(&server, &dir, 0)).unwrap();
    let report = fetcher.fetch_page(2).await;

    assert!(!report.is_success());
    assert_eq!(report.attempts, 1);
    assert_eq!(requests_to(&server, "/houses").await, 1);
}

#[tokio::test]
async fn one_failed_photo_fails_the_attempt_and_retries_all_photos() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let body = houses_json(
        &server,
        &[
            (70, "70 Lake Rd", "/photos/70.jpg"),
            (71, "71 Lake Rd", "/photos/71.jpg"),
        ],
    );
    mount_page(&server, 7, body).await;
    mount_photo(&server, "/photos/70.jpg", b"seventy").await;

    // First request for photo 71 fails; the one after succeeds
    Mock::given(method("GET"))
        .and(path("/photos/71.jpg"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_photo(&server, "/photos/71.jpg", b"seventy-one").await;

    let fetcher = PageFetcher::new(test_config(&server, &dir, 1)).unwrap();
    let report = fetcher.fetch_page(7).await;

    assert!(report.is_success());
    assert_eq!(report.attempts, 2);
    assert_eq!(report.downloaded, 2);

    // The photo that succeeded on attempt 1 was downloaded again on attempt 2
    assert_eq!(requests_to(&server, "/photos/70.jpg").await, 2);
    assert_eq!(requests_to(&server, "/photos/71.jpg").await, 2);
    assert_eq!(requests_to(&server, "/houses").await, 2);

    assert!(dir.path().join("id-70-70 Lake Rd.jpg").exists());
    let seventy_one = std::fs::read(dir.path().join("id-71-71 Lake Rd.jpg")).unwrap();
    assert_eq!(seventy_one, b"seventy-one");
}

#[tokio::test]
async fn bad_photo_url_fails_the_page_without_retrying() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let body = houses_json(&server, &[(5, "5 Birch Rd", "/photos/no-extension")]);
    mount_page(&server, 4, body).await;

    let fetcher = PageFetcher::new(test_config(&server, &dir, 3)).unwrap();
    let report = fetcher.fetch_page(4).await;

    assert!(!report.is_success());
    assert_eq!(report.attempts, 1, "malformed data must not burn retries");
    assert_eq!(requests_to(&server, "/houses").await, 1);
}

#[tokio::test]
async fn skip_policy_drops_bad_listing_and_completes_the_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let body = houses_json(
        &server,
        &[
            (8, "8 Cedar Way", "/photos/8.jpg"),
            (9, "9 Cedar Way", "/photos/no-extension"),
        ],
    );
    mount_page(&server, 6, body).await;
    mount_photo(&server, "/photos/8.jpg", b"eight").await;

    let mut config = test_config(&server, &dir, 1);
    config.download.bad_photo_url = BadPhotoUrlAction::Skip;

    let fetcher = PageFetcher::new(config).unwrap();
    let report = fetcher.fetch_page(6).await;

    assert!(report.is_success());
    assert_eq!(report.attempts, 1);
    assert_eq!(report.downloaded, 1);
    assert_eq!(report.skipped, 1);
    assert!(dir.path().join("id-8-8 Cedar Way.jpg").exists());
}

#[tokio::test]
async fn range_reports_every_page_in_order() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    for page in 3..=5 {
        mount_page(&server, page, r#"{ "houses": [] }"#.to_string()).await;
    }

    let fetcher = PageFetcher::new(test_config(&server, &dir, 1)).unwrap();
    let reports = fetcher.fetch_range(3, 5).await;

    assert_eq!(reports.len(), 3);
    let pages: Vec<u32> = reports.iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![3, 4, 5]);
    assert!(reports.iter().all(PageReport::is_success));
}

#[tokio::test]
async fn a_failed_page_does_not_affect_its_siblings() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, 3, r#"{ "houses": [] }"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/houses"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, 5, r#"{ "houses": [] }"#.to_string()).await;

    let fetcher = PageFetcher::new(test_config(&server, &dir, 1)).unwrap();
    let reports = fetcher.fetch_range(3, 5).await;

    assert!(reports[0].is_success());
    assert!(!reports[1].is_success());
    assert_eq!(reports[1].attempts, 2);
    assert!(reports[2].is_success());
}

#[tokio::test]
async fn single_page_range_fetches_one_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, 8, r#"{ "houses": [] }"#.to_string()).await;

    let fetcher = PageFetcher::new(test_config(&server, &dir, 1)).unwrap();
    let reports = fetcher.fetch_range(8, 8).await;

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].page, 8);
}
