//! Validated, ready-to-run crawl settings
//!
//! [`Config`] mirrors the TOML file. [`CrawlSettings`] is what the engine
//! consumes: URLs parsed, patterns compiled, directories resolved and created.

use crate::config::types::Config;
use crate::config::validation::{compile_patterns, validate};
use crate::storage::AssetKind;
use crate::url::{extract_domain, FilterPolicy};
use crate::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default User-Agent for plain HTTP fetches
pub const DEFAULT_USER_AGENT: &str = concat!("site-harvest/", env!("CARGO_PKG_VERSION"));

/// Immutable settings for one crawl
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Seed URL
    pub base_url: Url,

    /// Follow discovered links
    pub recursive: bool,

    /// Pause applied before every page and asset request
    pub request_delay: Duration,

    /// Timeout applied to every network request
    pub request_timeout: Duration,

    /// Use the rendered (headless browser) fetch for pages
    pub rendered_fetch: bool,

    /// WebDriver endpoint for rendered fetches
    pub webdriver_url: Option<String>,

    /// User-Agent header value
    pub user_agent: String,

    /// Link filtering rules
    pub policy: FilterPolicy,

    /// Root for stored HTML documents
    pub output_dir: PathBuf,

    /// JSON report destination
    pub report_path: Option<PathBuf>,

    /// Per-kind asset download directories; `None` means disabled
    pub assets: AssetSettings,
}

/// Enabled asset kinds and where each is stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSettings {
    pub images: Option<PathBuf>,
    pub css: Option<PathBuf>,
    pub js: Option<PathBuf>,
}

impl AssetSettings {
    /// Directory for an asset kind, if downloading that kind is enabled
    pub fn dir_for(&self, kind: AssetKind) -> Option<&Path> {
        match kind {
            AssetKind::Image => self.images.as_deref(),
            AssetKind::Css => self.css.as_deref(),
            AssetKind::Js => self.js.as_deref(),
        }
    }

    pub fn is_enabled(&self, kind: AssetKind) -> bool {
        self.dir_for(kind).is_some()
    }

    /// True when at least one asset kind is downloaded
    pub fn any_enabled(&self) -> bool {
        AssetKind::ALL.iter().any(|kind| self.is_enabled(*kind))
    }
}

impl CrawlSettings {
    /// Builds settings from a configuration, creating output directories
    ///
    /// Fails fast on anything that would otherwise break the crawl midway:
    /// invalid URLs or patterns, and output locations that cannot be created.
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        validate(config)?;

        let base_url = Url::parse(&config.crawler.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;
        let domain = extract_domain(&base_url).ok_or_else(|| {
            ConfigError::InvalidUrl(format!("base_url '{}' has no host", base_url))
        })?;

        let policy = FilterPolicy {
            domain,
            filter_eshop: config.filters.filter_eshop,
            filter_english: config.filters.filter_english,
            include: compile_patterns(&config.filters.include_patterns)?,
            exclude: compile_patterns(&config.filters.exclude_patterns)?,
        };

        let output_dir = PathBuf::from(&config.output.output_dir);
        let asset_dir = |enabled: bool, dir: &Option<String>, fallback: &str| {
            enabled.then(|| {
                dir.as_ref()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| output_dir.join(fallback))
            })
        };

        let assets = AssetSettings {
            images: asset_dir(config.assets.download_images, &config.assets.images_dir, "images"),
            css: asset_dir(config.assets.download_css, &config.assets.css_dir, "css"),
            js: asset_dir(config.assets.download_js, &config.assets.js_dir, "js"),
        };

        let request_delay = Duration::try_from_secs_f64(config.crawler.request_delay)
            .map_err(|e| {
                ConfigError::Validation(format!(
                    "request_delay {} is not a valid duration: {}",
                    config.crawler.request_delay, e
                ))
            })?;

        let settings = Self {
            base_url,
            recursive: config.crawler.recursive,
            request_delay,
            request_timeout: Duration::from_secs(config.crawler.request_timeout),
            rendered_fetch: config.crawler.rendered_fetch,
            webdriver_url: config.crawler.webdriver_url.clone(),
            user_agent: config
                .crawler
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            policy,
            output_dir,
            report_path: config.output.report_path.as_ref().map(PathBuf::from),
            assets,
        };

        settings.prepare_directories()?;
        Ok(settings)
    }

    /// Creates the output root and every enabled asset directory
    pub fn prepare_directories(&self) -> ConfigResult<()> {
        let dirs = std::iter::once(self.output_dir.as_path())
            .chain(AssetKind::ALL.iter().filter_map(|kind| self.assets.dir_for(*kind)));

        for dir in dirs {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::OutputRoot {
                path: dir.display().to_string(),
                source,
            })?;
        }

        Ok(())
    }

    /// Domain (`host[:port]`) the crawl is restricted to
    pub fn domain(&self) -> &str {
        &self.policy.domain
    }
}
