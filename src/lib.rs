//! # listing-dl
//!
//! Batch fetcher for a paginated house-listing API: each requested page is
//! fetched with bounded retry, and every photo the page references is
//! downloaded concurrently to local storage.
//!
//! ## Design Philosophy
//!
//! listing-dl is designed to be:
//! - **Best-effort** - A failed page never aborts its siblings; the run
//!   always completes and reports what happened
//! - **Page-granular** - Retry happens per page; a single failed photo
//!   fails the attempt and the next attempt re-downloads the whole page
//! - **Library-first** - The binary is a thin argument parser over
//!   [`PageFetcher`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use listing_dl::{Config, PageFetcher, utils::ensure_download_dir};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     ensure_download_dir(&config.download.download_dir).await?;
//!
//!     let fetcher = PageFetcher::new(config)?;
//!     let reports = fetcher.fetch_range(1, 10).await;
//!
//!     for report in &reports {
//!         println!("page {}: success={}", report.page, report.is_success());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Listings API client
pub mod client;
/// Configuration types
pub mod config;
/// Photo download streaming
pub mod downloader;
/// Error types
pub mod error;
/// Page retrieval and fan-out download engine
pub mod fetcher;
/// Retry classification and backoff
pub mod retry;
/// Core types and reports
pub mod types;
/// Filesystem bootstrap helpers
pub mod utils;

// Re-export commonly used types
pub use client::ListingsClient;
pub use config::{ApiConfig, BadPhotoUrlAction, Config, DownloadConfig, RetryConfig};
pub use downloader::PhotoDownloader;
pub use error::{DownloadError, Error, Result};
pub use fetcher::PageFetcher;
pub use retry::IsRetryable;
pub use types::{DownloadTarget, Listing, PageOutcome, PageReport};
