//! Crawl engine - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates one run:
//! - Seeding and draining the frontier
//! - Fetching, extracting and storing each page
//! - Downloading page assets
//! - Following in-domain links through the filter policy
//! - Honoring stop requests and writing the final report

use crate::config::CrawlSettings;
use crate::crawler::assets::fetch_assets;
use crate::crawler::extractor::{extract, PageContent};
use crate::crawler::frontier::{progress_of, Frontier};
use crate::crawler::transport::{HttpTransport, Transport};
use crate::output::{write_report, Notifier, PageRecord, Progress, TracingNotifier};
use crate::state::{RunState, RunStatistics};
use crate::storage::{AssetKind, FileStore, Store};
use crate::url::{normalize, normalize_absolute, should_filter};
use crate::{HarvestError, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use url::Url;

/// Cloneable handle for stopping a run from another task or thread
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Asks the running crawl to stop after the current page
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Result of one run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Terminal state the run ended in
    pub state: RunState,
    pub stats: RunStatistics,
    /// Scraped pages in processing order
    pub pages: Vec<PageRecord>,
    /// Frontier as it was when the loop exited
    pub frontier: Frontier,
    /// Where the report was written, if it was
    pub report_path: Option<PathBuf>,
    /// Why the run failed, if it did
    pub failure: Option<String>,
}

impl CrawlOutcome {
    /// Number of visited URLs, as reported in `total_urls`
    pub fn total_urls(&self) -> usize {
        self.frontier.visited_count()
    }
}

/// Moves the engine out of `Running` if a run is dropped before finishing
///
/// Covers cancelled run futures (timeouts, `select!`) and panics inside the
/// crawl loop; either way the engine ends up `Failed` and can run again.
struct RunningGuard<'a> {
    state: &'a Mutex<RunState>,
    finished: bool,
}

impl<'a> RunningGuard<'a> {
    fn new(state: &'a Mutex<RunState>) -> Self {
        Self {
            state,
            finished: false,
        }
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_running() {
            tracing::warn!("Run abandoned before finishing, marking it failed");
            *state = RunState::Failed;
        }
    }
}

/// Mutable state of a run in progress
struct RunContext {
    frontier: Frontier,
    stats: RunStatistics,
    pages: Vec<PageRecord>,
}

/// Single-domain crawl engine
///
/// One engine may run many times, one run at a time. Each run starts with a
/// fresh frontier and statistics.
pub struct Engine {
    settings: Arc<CrawlSettings>,
    transport: Arc<dyn Transport>,
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    stop: Arc<AtomicBool>,
    state: Mutex<RunState>,
}

impl Engine {
    /// Creates an engine reporting through [`TracingNotifier`]
    pub fn new(
        settings: CrawlSettings,
        transport: Arc<dyn Transport>,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
            store,
            notifier: Arc::new(TracingNotifier),
            stop: Arc::new(AtomicBool::new(false)),
            state: Mutex::new(RunState::Idle),
        }
    }

    /// Replaces the notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Creates an engine with the HTTP transport and filesystem store
    pub async fn from_settings(settings: CrawlSettings) -> Result<Self> {
        let transport = HttpTransport::from_settings(&settings).await?;
        let store = FileStore::from_settings(&settings);
        Ok(Self::new(settings, Arc::new(transport), Arc::new(store)))
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Requests the current run to stop; safe to call from anywhere
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: Arc::clone(&self.stop),
        }
    }

    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn transition(&self, next: RunState) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_running() && next.is_running() {
            return Err(HarvestError::RunInProgress);
        }
        if !state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: *state,
                to: next,
            });
        }
        tracing::debug!("Engine state {} -> {}", state, next);
        *state = next;
        Ok(())
    }

    /// Runs one crawl to completion, stop, or failure
    ///
    /// Per-page problems never abort the run; they are counted and reported.
    /// Only a second concurrent call returns an error.
    pub async fn run(&self) -> Result<CrawlOutcome> {
        self.transition(RunState::Running)?;
        let mut guard = RunningGuard::new(&self.state);
        self.stop.store(false, Ordering::Relaxed);

        let outcome = self.crawl().await;
        guard.finished = true;
        self.transition(outcome.state)?;

        tracing::info!(
            "Run {}: {} visited, {} successful, {} failed, {} filtered",
            outcome.state,
            outcome.total_urls(),
            outcome.stats.successful,
            outcome.stats.failed,
            outcome.stats.filtered
        );
        Ok(outcome)
    }

    async fn crawl(&self) -> CrawlOutcome {
        let seed = normalize_absolute(&self.settings.base_url);
        let mut ctx = RunContext {
            frontier: Frontier::seeded(seed),
            stats: RunStatistics::started_now(),
            pages: Vec::new(),
        };

        if let Err(e) = tokio::fs::create_dir_all(&self.settings.output_dir).await {
            let cause = format!(
                "Cannot create output directory {}: {}",
                self.settings.output_dir.display(),
                e
            );
            self.notifier.on_status(&cause);
            ctx.stats.finish();
            return self.finish(ctx, RunState::Failed, Some(cause)).await;
        }

        self.notifier
            .on_status(&format!("Starting scraping from {}", self.settings.base_url));
        self.notifier.on_progress(Progress::new(0, 0, 1));

        while !self.stop_requested() {
            let Some(url) = ctx.frontier.next() else {
                break;
            };
            ctx.stats.total_processed += 1;

            self.process_page(&url, &mut ctx).await;

            if self.stop_requested() {
                break;
            }

            let (percent, done, total) = progress_of(&ctx.frontier);
            self.notifier
                .on_progress(Progress::new(percent, done, total));
        }
        let stopped = self.stop_requested();
        ctx.stats.finish();
        let visited = ctx.frontier.visited_count();

        let state = if stopped {
            self.notifier.on_status(&format!(
                "Scraping stopped. Processed {} URLs in {:.2} seconds.",
                visited,
                ctx.stats.duration_seconds()
            ));
            RunState::Stopped
        } else {
            self.notifier
                .on_progress(Progress::new(100, visited, visited));
            self.notifier.on_status(&format!(
                "Scraping completed. Processed {} URLs in {:.2} seconds.",
                visited,
                ctx.stats.duration_seconds()
            ));
            RunState::Completed
        };
        self.notifier.on_status(&format!(
            "Successful: {}, Failed: {}, Filtered: {}",
            ctx.stats.successful, ctx.stats.failed, ctx.stats.filtered
        ));

        self.finish(ctx, state, None).await
    }

    /// Writes the report if configured and assembles the outcome
    async fn finish(&self, ctx: RunContext, state: RunState, failure: Option<String>) -> CrawlOutcome {
        let mut outcome = CrawlOutcome {
            state,
            stats: ctx.stats,
            pages: ctx.pages,
            frontier: ctx.frontier,
            report_path: None,
            failure,
        };

        if outcome.state == RunState::Failed {
            return outcome;
        }

        if let Some(path) = &self.settings.report_path {
            match write_report(
                path,
                &outcome.stats,
                outcome.frontier.visited_count(),
                &outcome.pages,
                &self.settings.assets,
            )
            .await
            {
                Ok(()) => {
                    self.notifier
                        .on_status(&format!("Results saved to {}", path.display()));
                    outcome.report_path = Some(path.clone());
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    self.notifier
                        .on_status(&format!("Error saving results: {}", e));
                    outcome.state = RunState::Failed;
                    outcome.failure = Some(e.to_string());
                }
            }
        }

        outcome
    }

    /// Processes a single URL taken off the frontier
    ///
    /// This method:
    /// 1. Fetches the document
    /// 2. Extracts title, text, links and asset references
    /// 3. Stores the document and downloads assets
    /// 4. Records the page
    /// 5. Queues or skips discovered links
    async fn process_page(&self, url: &str, ctx: &mut RunContext) {
        tracing::debug!("Processing URL: {}", url);
        self.notifier.on_status(&format!("Processing: {}", url));

        let page_url = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                self.page_failed(ctx, &format!("Invalid URL {}: {}", url, e));
                return;
            }
        };

        let (content, document) = match self.fetch_page(&page_url).await {
            Ok(fetched) => fetched,
            Err(message) => {
                self.page_failed(ctx, &message);
                return;
            }
        };

        let html_file = match self.store.store_document(&page_url, &document).await {
            Ok(path) => Some(path.display().to_string()),
            Err(e) => {
                let message = format!("Error saving HTML for {}: {}", url, e);
                tracing::warn!("{}", message);
                self.notifier.on_status(&message);
                None
            }
        };

        let mut record = PageRecord {
            url: url.to_string(),
            title: content.title.clone(),
            html_file,
            content_snippet: content.snippet(),
            ..Default::default()
        };

        let assets = &self.settings.assets;
        if assets.any_enabled() {
            let result = fetch_assets(
                self.transport.as_ref(),
                self.store.as_ref(),
                self.notifier.as_ref(),
                &content,
                &page_url,
                &self.settings,
            )
            .await;

            for kind in AssetKind::ALL {
                let stored = result.for_kind(kind).stored.len();
                ctx.stats.record_downloads(kind, stored as u64);
                if stored > 0 {
                    self.notifier
                        .on_status(&format!("Downloaded {} {} files for {}", stored, kind, url));
                }
            }

            record.downloaded_images = result.paths(AssetKind::Image);
            record.downloaded_css = assets
                .is_enabled(AssetKind::Css)
                .then(|| result.paths(AssetKind::Css));
            record.downloaded_js = assets
                .is_enabled(AssetKind::Js)
                .then(|| result.paths(AssetKind::Js));
        }

        ctx.pages.push(record);
        ctx.stats.successful += 1;

        if self.settings.recursive {
            let new_links = self.follow_links(&content, &page_url, ctx);
            self.notifier
                .on_status(&format!("Found {} new links on {}", new_links, url));
        }
    }

    /// Fetches and extracts a page; errors come back as status messages
    async fn fetch_page(&self, page_url: &Url) -> std::result::Result<(PageContent, String), String> {
        if !self.settings.request_delay.is_zero() {
            tokio::time::sleep(self.settings.request_delay).await;
        }

        let document = self
            .transport
            .fetch_document(page_url, self.settings.rendered_fetch)
            .await
            .map_err(|e| format!("Error getting page content for {}: {}", page_url, e))?;

        let content = extract(&document, page_url)
            .map_err(|e| format!("Error parsing page {}: {}", page_url, e))?;

        Ok((content, document))
    }

    /// Normalizes discovered links and queues the accepted ones
    ///
    /// Returns how many URLs were newly queued.
    fn follow_links(&self, content: &PageContent, page_url: &Url, ctx: &mut RunContext) -> usize {
        let mut new_links = 0;

        for link in &content.links {
            let normalized = match normalize(link, page_url) {
                Ok(n) => n,
                Err(e) => {
                    tracing::trace!("Ignoring link {}: {}", link, e);
                    continue;
                }
            };

            if ctx.frontier.is_known(&normalized) {
                continue;
            }

            if should_filter(&normalized, &self.settings.policy) {
                tracing::trace!("Filtered {}", normalized);
                ctx.frontier.skip(normalized);
                ctx.stats.filtered += 1;
            } else if ctx.frontier.enqueue(normalized) {
                new_links += 1;
            }
        }

        new_links
    }

    fn page_failed(&self, ctx: &mut RunContext, message: &str) {
        tracing::warn!("{}", message);
        self.notifier.on_status(message);
        ctx.stats.failed += 1;
    }
}
