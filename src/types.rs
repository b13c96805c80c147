//! Core data model: listings, download targets, and page reports

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One house record as returned by the listings API
///
/// Immutable once deserialized; each listing maps to exactly one downloaded
/// photo file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Unique listing identifier
    pub id: i64,

    /// Street address of the house
    pub address: String,

    /// URL of the listing photo
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}

/// A single photo download derived from a [`Listing`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Where to fetch the photo from
    pub source_url: String,

    /// Filename to write under the download directory,
    /// `id-<id>-<address><extension>`
    ///
    /// The address is used verbatim; addresses are assumed to contain no
    /// path-breaking characters.
    pub filename: String,
}

/// Matches the final dotted suffix of a URL path, e.g. `.jpg`
#[allow(clippy::expect_used)]
fn extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.\w+$").expect("static pattern compiles"))
}

impl DownloadTarget {
    /// Derive the download target for a listing
    ///
    /// The destination filename is a pure function of
    /// `(id, address, photo_url)`: same inputs always produce the same
    /// filename. The extension is the final dotted suffix of the photo
    /// URL's path, dot included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadPhotoUrl`] if the photo URL does not parse or
    /// its path carries no recognizable extension.
    pub fn for_listing(listing: &Listing) -> Result<Self> {
        let bad_url = || Error::BadPhotoUrl {
            listing_id: listing.id,
            url: listing.photo_url.clone(),
        };

        let parsed = url::Url::parse(&listing.photo_url).map_err(|_| bad_url())?;
        let extension = extension_pattern()
            .find(parsed.path())
            .ok_or_else(bad_url)?;

        Ok(Self {
            source_url: listing.photo_url.clone(),
            filename: format!("id-{}-{}{}", listing.id, listing.address, extension.as_str()),
        })
    }
}

/// Final outcome of one page's processing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOutcome {
    /// Every photo on the page was downloaded
    Complete,
    /// The page gave up after exhausting retries or hitting a
    /// non-retryable error
    Failed {
        /// Display form of the last error
        reason: String,
    },
}

/// Structured per-page result returned to the orchestrator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReport {
    /// The page number this report covers
    pub page: u32,

    /// Total attempts made (1-indexed; 1 means no retry was needed)
    pub attempts: u32,

    /// Photos downloaded on the final attempt
    pub downloaded: usize,

    /// Listings skipped for unusable photo URLs (only under the `skip`
    /// policy)
    pub skipped: usize,

    /// Whether the page ultimately completed
    pub outcome: PageOutcome,
}

impl PageReport {
    /// True if the page completed successfully
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, PageOutcome::Complete)
    }
}
