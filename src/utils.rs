//! Filesystem bootstrap helpers

use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// Ensure the download directory exists before the engine runs
///
/// Creates the directory (and any missing parents) if it is absent. The
/// engine assumes the directory exists for every write; a failure here
/// aborts the run before any page is fetched.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
///
/// # Examples
///
/// ```no_run
/// use listing_dl::utils::ensure_download_dir;
/// use std::path::Path;
///
/// # async fn example() -> listing_dl::Result<()> {
/// ensure_download_dir(Path::new("downloads")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn ensure_download_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        tokio::fs::create_dir_all(path).await?;
        debug!(path = %path.display(), "created download directory");
    }
    Ok(())
}
