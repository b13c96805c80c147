//! Shared fixtures for integration tests.

use listing_dl::{ApiConfig, Config, DownloadConfig, RetryConfig};
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Engine config pointed at a mock server, with fast retry pacing
pub fn test_config(server: &MockServer, download_dir: &Path, max_retries: u32) -> Config {
    Config {
        api: ApiConfig {
            base_url: server.uri(),
            ..ApiConfig::default()
        },
        download: DownloadConfig {
            download_dir: download_dir.to_path_buf(),
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
pub fn houses_json(server: &MockServer, houses: &[(i64, &str, &str)]) -> String {
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

/// Serve a listings page
pub async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/houses"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve a photo body
pub async fn mount_photo(server: &MockServer, photo_path: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(photo_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}
