use serde::Deserialize;

/// Main configuration structure for Site-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub assets: AssetConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; its host defines the crawl domain
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Follow links discovered on fetched pages
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Pause before every page and asset request (seconds)
    #[serde(rename = "request-delay", default)]
    pub request_delay: f64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Fetch pages through a headless browser instead of a plain GET
    #[serde(rename = "rendered-fetch", default)]
    pub rendered_fetch: bool,

    /// WebDriver endpoint used for rendered fetches
    #[serde(rename = "webdriver-url", default)]
    pub webdriver_url: Option<String>,

    /// User-Agent header sent with plain HTTP requests
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,
}

/// URL filtering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Skip URLs that look like e-shop pages
    #[serde(rename = "filter-eshop", default = "default_true")]
    pub filter_eshop: bool,

    /// Skip URLs that look like English-language pages
    #[serde(rename = "filter-english", default = "default_true")]
    pub filter_english: bool,

    /// Regular expressions; when non-empty a URL must match at least one
    #[serde(rename = "include-patterns", default)]
    pub include_patterns: Vec<String>,

    /// Regular expressions; a URL matching any of them is skipped
    #[serde(rename = "exclude-patterns", default)]
    pub exclude_patterns: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory for stored HTML documents
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: String,

    /// Where the JSON report is written; no report when absent
    #[serde(rename = "report-path", default)]
    pub report_path: Option<String>,
}

/// Asset download configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetConfig {
    #[serde(rename = "download-images", default)]
    pub download_images: bool,

    #[serde(rename = "images-dir", default)]
    pub images_dir: Option<String>,

    #[serde(rename = "download-css", default)]
    pub download_css: bool,

    #[serde(rename = "css-dir", default)]
    pub css_dir: Option<String>,

    #[serde(rename = "download-js", default)]
    pub download_js: bool,

    #[serde(rename = "js-dir", default)]
    pub js_dir: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    10
}

fn default_output_dir() -> String {
    "scrap".to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            recursive: true,
            request_delay: 0.0,
            request_timeout: default_request_timeout(),
            rendered_fetch: false,
            webdriver_url: None,
            user_agent: None,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            filter_eshop: true,
            filter_english: true,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            report_path: None,
        }
    }
}
