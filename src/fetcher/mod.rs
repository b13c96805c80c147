//! Page retrieval and fan-out download engine
//!
//! [`PageFetcher`] owns the two-layer control flow at the heart of the
//! crate: a bounded retry loop around each page, and a concurrent
//! all-or-nothing download of every photo the page references. Failures
//! never escape to the caller as errors; each page yields a
//! [`PageReport`].

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::client::ListingsClient;
use crate::config::{BadPhotoUrlAction, Config};
use crate::downloader::PhotoDownloader;
use crate::error::{Error, Result};
use crate::retry::{Backoff, IsRetryable};
use crate::types::{DownloadTarget, PageOutcome, PageReport};
use futures::future::{join_all, try_join_all};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Fetches listing pages and fans out their photo downloads
///
/// Cloneable: the config is shared behind an `Arc` and both HTTP clients
/// share their connection pools, so page tasks clone the fetcher freely.
#[derive(Clone)]
pub struct PageFetcher {
    /// Listings API client
    client: ListingsClient,

    /// Photo downloader shared by all fan-out tasks
    photos: PhotoDownloader,

    /// Engine configuration
    config: Arc<Config>,
}

impl PageFetcher {
    /// Create a fetcher from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or an
    /// HTTP client cannot be created.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = ListingsClient::new(&config.api)?;
        let photo_http = reqwest::Client::builder()
            .user_agent(&config.api.user_agent)
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create photo HTTP client: {e}"),
                key: None,
            })?;
        let photos = PhotoDownloader::new(photo_http, &config.download.download_dir);

        Ok(Self {
            client,
            photos,
            config: Arc::new(config),
        })
    }

    /// Fetch one page and download all of its photos, retrying on failure
    ///
    /// The page is attempted up to `max_retries + 1` times. Any failure
    /// within an attempt (listings request, body decode, or a single
    /// photo download) fails that whole attempt, and the next attempt
    /// refetches the page and re-downloads every photo. A non-retryable
    /// error (malformed photo URL under the fail-page policy) ends the
    /// page immediately.
    ///
    /// Never returns an error; the outcome is carried in the report.
    pub async fn fetch_page(&self, page: u32) -> PageReport {
        let max_retries = self.config.retry.max_retries;
        let mut backoff = Backoff::new(&self.config.retry);
        let mut attempt: u32 = 0;

        loop {
            match self.attempt_page(page).await {
                Ok((downloaded, skipped)) => {
                    let attempts = attempt + 1;
                    info!(page, attempts, downloaded, skipped, "page complete");
                    return PageReport {
                        page,
                        attempts,
                        downloaded,
                        skipped,
                        outcome: PageOutcome::Complete,
                    };
                }
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    warn!(
                        page,
                        attempt,
                        max_attempts = max_retries + 1,
                        error = %e,
                        "page attempt failed, retrying"
                    );
                    backoff.wait().await;
                }
                Err(e) => {
                    let attempts = attempt + 1;
                    error!(page, attempts, error = %e, "page failed");
                    return PageReport {
                        page,
                        attempts,
                        downloaded: 0,
                        skipped: 0,
                        outcome: PageOutcome::Failed {
                            reason: e.to_string(),
                        },
                    };
                }
            }
        }
    }

    /// Fetch every page in `start..=end` concurrently
    ///
    /// Pages run independently with no ordering between completions; one
    /// page exhausting its retries does not affect its siblings. Reports
    /// come back in page order. Callers validate `end >= start` before
    /// invoking.
    pub async fn fetch_range(&self, start: u32, end: u32) -> Vec<PageReport> {
        let handles: Vec<_> = (start..=end)
            .map(|page| {
                let fetcher = self.clone();
                tokio::spawn(async move { fetcher.fetch_page(page).await })
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (result, page) in join_all(handles).await.into_iter().zip(start..=end) {
            reports.push(result.unwrap_or_else(|e| PageReport {
                page,
                attempts: 0,
                downloaded: 0,
                skipped: 0,
                outcome: PageOutcome::Failed {
                    reason: format!("page task failed to complete: {e}"),
                },
            }));
        }
        reports
    }

    /// Run a single attempt: fetch listings, derive targets, fan out
    ///
    /// Returns `(downloaded, skipped)` counts on success.
    async fn attempt_page(&self, page: u32) -> Result<(usize, usize)> {
        let listings = self.client.fetch_page(page).await?;

        let mut targets = Vec::with_capacity(listings.len());
        let mut skipped = 0usize;
        for listing in &listings {
            match DownloadTarget::for_listing(listing) {
                Ok(target) => targets.push(target),
                Err(e) => match self.config.download.bad_photo_url {
                    BadPhotoUrlAction::Skip => {
                        warn!(page, listing_id = listing.id, error = %e, "skipping listing");
                        skipped += 1;
                    }
                    BadPhotoUrlAction::FailPage => return Err(e),
                },
            }
        }

        let handles: Vec<_> = targets
            .into_iter()
            .map(|target| {
                let photos = self.photos.clone();
                tokio::spawn(async move { photos.download(&target).await })
            })
            .collect();
        let downloaded = handles.len();

        // All-or-nothing join: the first failure resolves the join and the
        // remaining handles are dropped, which detaches (does not abort)
        // their tasks. Already-issued requests run to completion; a retry
        // may re-download photos whose previous attempt is still in flight.
        try_join_all(handles.into_iter().map(flatten_join)).await?;

        Ok((downloaded, skipped))
    }
}

/// Await a spawned download, surfacing panics as crate errors
async fn flatten_join(handle: JoinHandle<Result<()>>) -> Result<()> {
    match handle.await {
        Ok(result) => result,
        Err(e) => Err(Error::TaskJoin(e.to_string())),
    }
}
