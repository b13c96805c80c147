//! Configuration types for listing-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Listings API configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the listings API (the `/houses` path is appended)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (None = no timeout; a hung connection blocks
    /// that page indefinitely, matching the upstream client's behavior)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Download behavior configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory photos are written into (default: "downloads")
    ///
    /// Must exist before the engine runs; see
    /// [`crate::utils::ensure_download_dir`].
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// What to do with a listing whose photo URL has no derivable extension
    #[serde(default)]
    pub bad_photo_url: BadPhotoUrlAction,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            bad_photo_url: BadPhotoUrlAction::default(),
        }
    }
}

/// Action to take when a listing's photo URL yields no file extension
///
/// Retrying cannot fix malformed listing data, so neither action feeds the
/// page retry loop: `FailPage` fails the page on the spot, `Skip` drops the
/// listing with a warning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadPhotoUrlAction {
    /// Fail the whole page immediately, without retrying (default)
    #[default]
    FailPage,
    /// Skip the listing, log a warning, and continue with the page
    Skip,
}

/// Retry configuration for page fetches
///
/// A page is attempted `max_retries + 1` times in the worst case.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Number of retries after the first failed attempt (default: 1)
    ///
    /// `max_retries = 0` means exactly one attempt, no retry.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in seconds (default: 1)
    ///
    /// Zero recovers immediate re-attempt behavior.
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries, in seconds (default: 30)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Main configuration for the page fetcher
///
/// Fields are organized into logical sub-configs:
/// - [`api`](ApiConfig) - listings endpoint, timeout, user agent
/// - [`download`](DownloadConfig) - destination directory, malformed-URL policy
/// - [`retry`](RetryConfig) - retry count and backoff schedule
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listings API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Download behavior settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Page retry settings
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Validate the configuration, returning the first problem found
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL does not parse or the
    /// backoff multiplier is below 1.0.
    pub fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.api.base_url).is_err() {
            return Err(Error::Config {
                message: format!("invalid base URL: {}", self.api.base_url),
                key: Some("api.base_url".to_string()),
            });
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(Error::Config {
                message: format!(
                    "backoff multiplier must be at least 1.0, got {}",
                    self.retry.backoff_multiplier
                ),
                key: Some("retry.backoff_multiplier".to_string()),
            });
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://app-homevision-staging.herokuapp.com/api_project".to_string()
}

fn default_user_agent() -> String {
    concat!("listing-dl/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_max_retries() -> u32 {
    1
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
