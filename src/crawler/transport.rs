//! HTTP transport implementation
//!
//! This module handles all network requests for the crawler:
//! - Building the HTTP client with user agent and timeouts
//! - GET requests for page documents and asset bytes
//! - Rendered fetches through a WebDriver session (`browser` feature)
//! - Error classification

use crate::config::CrawlSettings;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised while fetching a URL
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error for {url}: {message}")]
    Http { url: String, message: String },

    #[error("Invalid server response: {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Rendered fetch requested for {url} but no browser is available")]
    RenderingUnavailable { url: String },

    #[error("Browser error for {url}: {message}")]
    Browser { url: String, message: String },
}

/// Fetch capability used by the engine and the resource fetcher
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches a page and returns its document text
    ///
    /// With `rendered` set, the page is loaded in a headless browser and the
    /// rendered DOM is returned instead of the raw response body.
    async fn fetch_document(&self, url: &Url, rendered: bool) -> Result<String, TransportError>;

    /// Fetches the raw bytes of an image, stylesheet or script
    async fn fetch_asset(&self, url: &Url) -> Result<Vec<u8>, TransportError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use site_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("site-harvest/0.1", Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Transport backed by `reqwest`, with an optional WebDriver for rendered fetches
pub struct HttpTransport {
    client: Client,
    #[cfg_attr(not(feature = "browser"), allow(dead_code))]
    timeout: Duration,
    #[cfg(feature = "browser")]
    browser: Option<fantoccini::Client>,
}

impl HttpTransport {
    /// Creates a plain HTTP transport
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, timeout)?,
            timeout,
            #[cfg(feature = "browser")]
            browser: None,
        })
    }

    /// Creates a transport for the given settings
    ///
    /// When rendered fetching is requested and a WebDriver URL is configured
    /// (and the crate is built with the `browser` feature), a browser session
    /// is opened up front. Without one, rendered fetches fail per page with
    /// [`TransportError::RenderingUnavailable`].
    pub async fn from_settings(settings: &CrawlSettings) -> Result<Self, TransportError> {
        #[allow(unused_mut)]
        let mut transport =
            Self::new(&settings.user_agent, settings.request_timeout).map_err(|e| {
                TransportError::Http {
                    url: settings.base_url.to_string(),
                    message: e.to_string(),
                }
            })?;

        if settings.rendered_fetch {
            match &settings.webdriver_url {
                #[cfg(feature = "browser")]
                Some(webdriver) => {
                    transport.browser = Some(connect_browser(webdriver).await?);
                    tracing::info!("WebDriver session opened at {}", webdriver);
                }
                #[cfg(not(feature = "browser"))]
                Some(webdriver) => {
                    tracing::warn!(
                        "Rendered fetch via {} needs the `browser` feature; pages will fail",
                        webdriver
                    );
                }
                None => {
                    tracing::warn!("Rendered fetch enabled without webdriver-url; pages will fail");
                }
            }
        }

        Ok(transport)
    }

    /// Closes the browser session, if one was opened
    pub async fn close(self) {
        #[cfg(feature = "browser")]
        if let Some(browser) = self.browser {
            if let Err(e) = browser.close().await {
                tracing::warn!("Error closing WebDriver session: {}", e);
            }
        }
    }

    async fn get(&self, url: &Url) -> Result<Response, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn fetch_rendered(&self, url: &Url) -> Result<String, TransportError> {
        #[cfg(feature = "browser")]
        if let Some(browser) = &self.browser {
            let browser_error = |e: &dyn std::fmt::Display| TransportError::Browser {
                url: url.to_string(),
                message: e.to_string(),
            };
            let load = async {
                browser.goto(url.as_str()).await.map_err(|e| browser_error(&e))?;
                browser.source().await.map_err(|e| browser_error(&e))
            };
            return tokio::time::timeout(self.timeout, load)
                .await
                .map_err(|_| TransportError::Timeout {
                    url: url.to_string(),
                })?;
        }

        Err(TransportError::RenderingUnavailable {
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_document(&self, url: &Url, rendered: bool) -> Result<String, TransportError> {
        if rendered {
            return self.fetch_rendered(url).await;
        }

        let response = self.get(url).await?;
        response.text().await.map_err(|e| classify_error(url, e))
    }

    async fn fetch_asset(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await.map_err(|e| classify_error(url, e))?;
        Ok(bytes.to_vec())
    }
}

/// Maps a reqwest error onto the transport error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        TransportError::Http {
            url: url.to_string(),
            message: format!("Connection refused: {}", error),
        }
    } else {
        TransportError::Http {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(feature = "browser")]
async fn connect_browser(webdriver: &str) -> Result<fantoccini::Client, TransportError> {
    let mut caps = serde_json::Map::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        serde_json::json!({
            "args": ["--headless", "--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"]
        }),
    );

    fantoccini::ClientBuilder::rustls()
        .capabilities(caps)
        .connect(webdriver)
        .await
        .map_err(|e| TransportError::Browser {
            url: webdriver.to_string(),
            message: e.to_string(),
        })
}
