//! Listings API client

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::Listing;
use serde::Deserialize;
use tracing::debug;

/// Shape of the listings endpoint response body
#[derive(Debug, Deserialize)]
struct HousesResponse {
    houses: Vec<Listing>,
}

/// Client for the paginated house-listings API
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ListingsClient {
    /// HTTP client for listings requests
    http: reqwest::Client,

    /// Base URL the `/houses` path is appended to
    base_url: String,
}

impl ListingsClient {
    /// Create a client from the API configuration
    ///
    /// No request timeout is set unless the configuration asks for one; a
    /// hung connection blocks its page indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be created.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| Error::Config {
            message: format!("failed to create HTTP client: {e}"),
            key: None,
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one page of listings
    ///
    /// Issues `GET <base>/houses?page=<n>` and decodes the `houses` array
    /// from the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the endpoint returns a
    /// non-success status, or the body does not decode as a listings page.
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<Listing>> {
        let url = format!("{}/houses", self.base_url);
        debug!(page, url = %url, "fetching listings page");

        let response = self
            .http
            .get(&url)
            .query(&[("page", page)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: format!("{url}?page={page}"),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: HousesResponse = serde_json::from_str(&body)?;
        debug!(page, listings = parsed.houses.len(), "listings page decoded");
        Ok(parsed.houses)
    }
}
