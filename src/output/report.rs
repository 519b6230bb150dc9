//! JSON report of a crawl run
//!
//! The report has two members: `stats`, the run counters, and
//! `scraped_data`, one record per successfully scraped page in processing
//! order. CSS and JS fields are present only when those downloads were
//! enabled for the run.

use crate::config::AssetSettings;
use crate::state::RunStatistics;
use crate::storage::AssetKind;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing the report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// What was scraped from one page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    /// Stored document location; `null` when storing failed
    pub html_file: Option<String>,
    pub content_snippet: String,
    pub downloaded_images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloaded_css: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloaded_js: Option<Vec<String>>,
}

/// The `stats` member of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportStats {
    pub total_urls: u64,
    pub successful_scrapes: u64,
    pub failed_scrapes: u64,
    pub filtered_urls: u64,
    pub downloaded_images: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloaded_css: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloaded_js: Option<u64>,
    pub duration_seconds: f64,
}

impl ReportStats {
    /// Builds the stats member; `total_urls` is the number of visited URLs
    pub fn new(stats: &RunStatistics, total_urls: usize, assets: &AssetSettings) -> Self {
        let downloads = |kind: AssetKind| assets.is_enabled(kind).then(|| stats.downloads(kind));

        Self {
            total_urls: total_urls as u64,
            successful_scrapes: stats.successful,
            failed_scrapes: stats.failed,
            filtered_urls: stats.filtered,
            downloaded_images: stats.images_downloaded,
            downloaded_css: downloads(AssetKind::Css),
            downloaded_js: downloads(AssetKind::Js),
            duration_seconds: stats.duration_seconds(),
        }
    }
}

/// The full report document
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub stats: ReportStats,
    pub scraped_data: &'a [PageRecord],
}

/// Writes the report as pretty-printed UTF-8 JSON
///
/// # Arguments
///
/// * `path` - Destination file; missing parent directories are created
/// * `stats` - Statistics of the finished run
/// * `total_urls` - Number of visited URLs
/// * `pages` - Page records in processing order
/// * `assets` - Asset toggles of the run, deciding CSS/JS field presence
pub async fn write_report(
    path: &Path,
    stats: &RunStatistics,
    total_urls: usize,
    pages: &[PageRecord],
    assets: &AssetSettings,
) -> OutputResult<()> {
    let io_error = |source| OutputError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }

    let report = Report {
        stats: ReportStats::new(stats, total_urls, assets),
        scraped_data: pages,
    };

    let json = serde_json::to_vec_pretty(&report)?;
    tokio::fs::write(path, json).await.map_err(io_error)?;

    tracing::info!(
        "Report with {} pages written to {}",
        pages.len(),
        path.display()
    );
    Ok(())
}
