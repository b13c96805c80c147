//! Photo download: stream one remote resource to one local file

use crate::error::{DownloadError, Result};
use crate::types::DownloadTarget;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Downloads listing photos into a fixed directory
///
/// No retry lives at this layer; a failed download fails the enclosing page
/// attempt, and the page retry re-issues every photo. Cheap to clone so
/// each fan-out task can own a handle.
#[derive(Clone)]
pub struct PhotoDownloader {
    /// HTTP client for photo requests
    http: reqwest::Client,

    /// Directory downloads are written into
    download_dir: PathBuf,
}

impl PhotoDownloader {
    /// Create a downloader writing into `download_dir`
    ///
    /// The directory must already exist (see
    /// [`crate::utils::ensure_download_dir`]).
    #[must_use]
    pub fn new(http: reqwest::Client, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            http,
            download_dir: download_dir.into(),
        }
    }

    /// The directory this downloader writes into
    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Stream the target's photo to its destination file
    ///
    /// Chunks are written as they arrive. A failed download may leave a
    /// truncated file at the destination; partial files are not cleaned up.
    ///
    /// # Errors
    ///
    /// Returns a [`DownloadError`] wrapped in the crate error if the
    /// request fails, the server returns a non-success status, or a write
    /// fails.
    pub async fn download(&self, target: &DownloadTarget) -> Result<()> {
        let response = self
            .http
            .get(&target.source_url)
            .send()
            .await
            .map_err(|source| DownloadError::Request {
                url: target.source_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: target.source_url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let path = self.download_dir.join(&target.filename);
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|source| DownloadError::Write {
                path: path.clone(),
                source,
            })?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| DownloadError::Request {
                url: target.source_url.clone(),
                source,
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|source| DownloadError::Write {
                    path: path.clone(),
                    source,
                })?;
        }

        file.flush()
            .await
            .map_err(|source| DownloadError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(url = %target.source_url, path = %path.display(), "photo downloaded");
        Ok(())
    }
}
