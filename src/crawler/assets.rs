//! Resource fetcher: downloads images, stylesheets and scripts of a page
//!
//! Assets are fetched one after another in document order, so the stored
//! paths of a page are deterministic. A failing asset is reported and
//! skipped; it never fails the page.

use crate::config::{AssetSettings, CrawlSettings};
use crate::crawler::extractor::PageContent;
use crate::crawler::transport::Transport;
use crate::output::Notifier;
use crate::storage::{AssetKind, Store};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Outcome of downloading one asset kind for a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindResult {
    /// Stored paths, in reference order
    pub stored: Vec<PathBuf>,
    /// References that could not be resolved, fetched or stored
    pub failed: u64,
}

/// Outcome of downloading all enabled asset kinds for a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetResult {
    pub images: KindResult,
    pub css: KindResult,
    pub js: KindResult,
}

impl AssetResult {
    pub fn for_kind(&self, kind: AssetKind) -> &KindResult {
        match kind {
            AssetKind::Image => &self.images,
            AssetKind::Css => &self.css,
            AssetKind::Js => &self.js,
        }
    }

    fn for_kind_mut(&mut self, kind: AssetKind) -> &mut KindResult {
        match kind {
            AssetKind::Image => &mut self.images,
            AssetKind::Css => &mut self.css,
            AssetKind::Js => &mut self.js,
        }
    }

    /// Stored paths of one kind as display strings
    pub fn paths(&self, kind: AssetKind) -> Vec<String> {
        self.for_kind(kind)
            .stored
            .iter()
            .map(|p| p.display().to_string())
            .collect()
    }
}

/// Downloads the assets referenced by a page
pub struct ResourceFetcher<'a> {
    transport: &'a dyn Transport,
    store: &'a dyn Store,
    notifier: &'a dyn Notifier,
    assets: &'a AssetSettings,
    delay: Duration,
}

impl<'a> ResourceFetcher<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        store: &'a dyn Store,
        notifier: &'a dyn Notifier,
        assets: &'a AssetSettings,
        delay: Duration,
    ) -> Self {
        Self {
            transport,
            store,
            notifier,
            assets,
            delay,
        }
    }

    /// Fetches and stores every enabled asset kind referenced by `content`
    pub async fn fetch_assets(&self, content: &PageContent, page_url: &Url) -> AssetResult {
        let mut result = AssetResult::default();

        for kind in AssetKind::ALL {
            if !self.assets.is_enabled(kind) {
                continue;
            }

            let references = content.assets(kind);
            let kind_result = result.for_kind_mut(kind);

            for (ordinal, reference) in references.iter().enumerate() {
                let reference = reference.trim();
                if reference.is_empty() {
                    continue;
                }

                match self.fetch_one(kind, page_url, reference, ordinal).await {
                    Ok(path) => kind_result.stored.push(path),
                    Err(message) => {
                        tracing::warn!("{}", message);
                        self.notifier.on_status(&message);
                        kind_result.failed += 1;
                    }
                }
            }

            tracing::debug!(
                "{} {} assets stored for {} ({} failed)",
                kind_result.stored.len(),
                kind,
                page_url,
                kind_result.failed
            );
        }

        result
    }

    async fn fetch_one(
        &self,
        kind: AssetKind,
        page_url: &Url,
        reference: &str,
        ordinal: usize,
    ) -> Result<PathBuf, String> {
        let asset_url = resolve_asset(page_url, reference)
            .ok_or_else(|| format!("Cannot resolve {} reference {} on {}", kind, reference, page_url))?;
        let file_name = asset_file_name(&asset_url, kind, ordinal);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let bytes = self
            .transport
            .fetch_asset(&asset_url)
            .await
            .map_err(|e| format!("Error downloading {} {}: {}", kind, asset_url, e))?;

        self.store
            .store_asset(kind, page_url, &file_name, &bytes)
            .await
            .map_err(|e| format!("Error saving {} {}: {}", kind, asset_url, e))
    }
}

/// Downloads every enabled asset kind of a page with the settings' delay
pub async fn fetch_assets(
    transport: &dyn Transport,
    store: &dyn Store,
    notifier: &dyn Notifier,
    content: &PageContent,
    page_url: &Url,
    settings: &CrawlSettings,
) -> AssetResult {
    ResourceFetcher::new(
        transport,
        store,
        notifier,
        &settings.assets,
        settings.request_delay,
    )
    .fetch_assets(content, page_url)
    .await
}

/// Resolves an asset reference to an absolute http(s) URL
fn resolve_asset(page_url: &Url, reference: &str) -> Option<Url> {
    let url = page_url.join(reference).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

/// Chooses the file name for a downloaded asset
///
/// Uses the last segment of the URL path when it carries an extension that
/// belongs to `kind`; otherwise synthesizes `<kind>_<ordinal>.<ext>`.
///
/// # Examples
///
/// ```
/// use site_harvest::crawler::asset_file_name;
/// use site_harvest::storage::AssetKind;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/img/logo.png?v=2").unwrap();
/// assert_eq!(asset_file_name(&url, AssetKind::Image, 0), "logo.png");
///
/// let url = Url::parse("https://example.com/render?id=4").unwrap();
/// assert_eq!(asset_file_name(&url, AssetKind::Image, 3), "image_3.jpg");
/// ```
pub fn asset_file_name(url: &Url, kind: AssetKind, ordinal: usize) -> String {
    let base_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    let extension_matches = base_name
        .rsplit_once('.')
        .map(|(stem, ext)| {
            !stem.is_empty() && kind.extensions().contains(&ext.to_ascii_lowercase().as_str())
        })
        .unwrap_or(false);

    if extension_matches {
        base_name.to_string()
    } else {
        format!("{}_{}.{}", kind.prefix(), ordinal, kind.default_extension())
    }
}
