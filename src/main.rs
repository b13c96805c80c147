//! Thin CLI over the page fetcher.

use anyhow::bail;
use clap::Parser;
use listing_dl::{Config, PageFetcher, utils::ensure_download_dir};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Download house-listing photos from the paginated listings API
#[derive(Debug, Parser)]
#[command(name = "listing-dl", version, about)]
struct Cli {
    /// First page to fetch (positive integer)
    start_page: u32,

    /// Last page to fetch; defaults to START_PAGE
    end_page: Option<u32>,

    /// Number of fetching retries per page before giving up
    #[arg(long, default_value_t = 1)]
    retries: u32,

    /// Directory photos are written into
    #[arg(long, default_value = "downloads")]
    output: PathBuf,

    /// Base URL of the listings API
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if cli.start_page == 0 {
        bail!("<page> must be a positive integer");
    }
    let end_page = cli.end_page.unwrap_or(cli.start_page);
    if end_page < cli.start_page {
        bail!("<end-page> must be greater than or equal to <start-page>");
    }

    let mut config = Config::default();
    config.download.download_dir = cli.output;
    config.retry.max_retries = cli.retries;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    ensure_download_dir(&config.download.download_dir).await?;

    let fetcher = PageFetcher::new(config)?;
    let reports = fetcher.fetch_range(cli.start_page, end_page).await;

    let succeeded = reports.iter().filter(|r| r.is_success()).count();
    let failed = reports.len() - succeeded;
    let downloaded: usize = reports.iter().map(|r| r.downloaded).sum();
    info!(
        pages = reports.len(),
        succeeded, failed, downloaded, "run complete"
    );

    // Every requested page was attempted; per-page failures are reported
    // above but do not fail the process.
    Ok(())
}
