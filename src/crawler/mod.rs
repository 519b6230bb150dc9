//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP and rendered fetching behind the [`Transport`] trait
//! - HTML extraction of titles, text, links and asset references
//! - Asset downloads
//! - The frontier and the crawl loop itself

mod assets;
mod engine;
mod extractor;
mod frontier;
mod transport;

pub use assets::{asset_file_name, fetch_assets, AssetResult, KindResult, ResourceFetcher};
pub use engine::{CrawlOutcome, Engine, StopHandle};
pub use extractor::{extract, snippet, ExtractError, PageContent, NO_TITLE, SNIPPET_LENGTH};
pub use frontier::{percent, progress_of, Frontier};
pub use transport::{build_http_client, HttpTransport, Transport, TransportError};

use crate::config::CrawlSettings;
use crate::Result;

/// Runs a complete crawl with the HTTP transport and filesystem store
///
/// This is the main entry point for a one-shot crawl. It will:
/// 1. Build the HTTP transport (and browser session, if configured)
/// 2. Seed the frontier with the base URL
/// 3. Fetch, extract and store pages until the frontier is exhausted
/// 4. Write the report, if a report path is configured
///
/// # Arguments
///
/// * `settings` - Validated crawl settings
pub async fn crawl(settings: CrawlSettings) -> Result<CrawlOutcome> {
    Engine::from_settings(settings).await?.run().await
}
