//! Retry classification and backoff scheduling for page fetches
//!
//! A failed page attempt is retried at page granularity: the next attempt
//! refetches the listings and re-downloads every photo. This module decides
//! which errors feed that loop ([`IsRetryable`]) and how long to wait
//! between attempts ([`Backoff`], exponential with optional jitter). The
//! attempt loop itself lives in [`crate::fetcher::PageFetcher`].

use crate::config::RetryConfig;
use crate::error::Error;
use rand::Rng;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (network errors, bad statuses, undecodable bodies,
/// failed downloads) should return `true`. Failures a retry cannot fix
/// (malformed listing data, local misconfiguration) should return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the page should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Everything that can go wrong during a page attempt collapses
            // into "retry the page": transport errors, bad statuses,
            // unexpected body shapes, and per-photo download failures alike.
            Error::Network(_) => true,
            Error::Status { .. } => true,
            Error::Decode(_) => true,
            Error::Download(_) => true,
            Error::TaskJoin(_) => true,
            // Malformed photo URLs are data problems; another attempt
            // returns the same data.
            Error::BadPhotoUrl { .. } => false,
            // Config errors are permanent
            Error::Config { .. } => false,
            // I/O errors here are bootstrap failures, not download writes
            Error::Io(_) => false,
        }
    }
}

/// Exponential backoff schedule between page attempts
///
/// Delays start at `initial_delay` and grow by `backoff_multiplier` per
/// wait, capped at `max_delay`. With `jitter` enabled each wait is
/// uniformly stretched by 0–100% to prevent thundering herd across
/// concurrent pages.
#[derive(Debug)]
pub struct Backoff {
    delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: bool,
}

impl Backoff {
    /// Create a schedule from the retry configuration
    #[must_use]
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            delay: config.initial_delay,
            max_delay: config.max_delay,
            multiplier: config.backoff_multiplier,
            jitter: config.jitter,
        }
    }

    /// The next delay that [`wait`](Self::wait) will sleep for, pre-jitter
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        self.delay
    }

    /// Sleep for the current delay, then advance the schedule
    pub async fn wait(&mut self) {
        let delay = if self.jitter {
            add_jitter(self.delay)
        } else {
            self.delay
        };
        tokio::time::sleep(delay).await;

        let next = Duration::from_secs_f64(self.delay.as_secs_f64() * self.multiplier);
        self.delay = next.min(self.max_delay);
    }
}

/// Add random jitter to a delay
///
/// Jitter is uniformly distributed between 0% and 100% of the delay, so the
/// result is between `delay` and `2 * delay`.
fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    Duration::from_secs_f64(delay.as_secs_f64() * (1.0 + jitter_factor))
}
