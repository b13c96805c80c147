//! Error types for listing-dl
//!
//! A single crate-level [`Error`] covers every failure mode of a page
//! attempt. Network, status, decode, and download failures are deliberately
//! kept as sibling variants of one enum: the page retry loop treats all of
//! them uniformly (see [`crate::retry::IsRetryable`]).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for listing-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for listing-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// Network error while talking to the listings API
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Listings endpoint returned a non-success HTTP status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The URL that was requested
        url: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// Response body did not match the expected listings shape
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Photo download failed
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Photo URL has no derivable file extension
    #[error("listing {listing_id} has unusable photo URL: {url}")]
    BadPhotoUrl {
        /// The listing whose photo URL could not be used
        listing_id: i64,
        /// The offending photo URL
        url: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned download task panicked or was cancelled
    #[error("download task failed to complete: {0}")]
    TaskJoin(String),
}

/// Errors from downloading a single photo
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The HTTP request for the photo failed
    #[error("request for {url} failed: {source}")]
    Request {
        /// The photo URL that was requested
        url: String,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The photo URL returned a non-success HTTP status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The photo URL that was requested
        url: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// Writing the photo to disk failed
    #[error("failed to write {path}: {source}")]
    Write {
        /// The destination path being written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
