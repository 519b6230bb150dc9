use crate::storage::AssetKind;
use chrono::{DateTime, Utc};

/// Counters for a single crawl run
///
/// Created zeroed at the start of every run and frozen once the run ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    /// URLs taken off the queue, whether or not they succeeded
    pub total_processed: u64,
    pub successful: u64,
    pub failed: u64,
    /// Discovered links rejected by the filter policy
    pub filtered: u64,
    pub images_downloaded: u64,
    pub css_downloaded: u64,
    pub js_downloaded: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunStatistics {
    /// Fresh statistics stamped with the current time as start
    pub fn started_now() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Stamps the end time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Adds downloaded assets of one kind
    pub fn record_downloads(&mut self, kind: AssetKind, count: u64) {
        match kind {
            AssetKind::Image => self.images_downloaded += count,
            AssetKind::Css => self.css_downloaded += count,
            AssetKind::Js => self.js_downloaded += count,
        }
    }

    /// Downloaded assets of one kind
    pub fn downloads(&self, kind: AssetKind) -> u64 {
        match kind {
            AssetKind::Image => self.images_downloaded,
            AssetKind::Css => self.css_downloaded,
            AssetKind::Js => self.js_downloaded,
        }
    }

    /// Run duration in seconds; up to now if the run has not finished
    pub fn duration_seconds(&self) -> f64 {
        let Some(start) = self.started_at else {
            return 0.0;
        };
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - start)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}
