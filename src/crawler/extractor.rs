//! HTML extraction of page content
//!
//! This module turns a fetched document into a [`PageContent`]:
//! - Page title
//! - Main text (main region, content container, article, or body)
//! - Raw link targets from `<a href>`
//! - Raw image, stylesheet and script references

use crate::storage::AssetKind;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// Title used when a page has no `<title>` element
pub const NO_TITLE: &str = "No Title";

/// Maximum number of characters kept in a content snippet
pub const SNIPPET_LENGTH: usize = 500;

/// Selectors tried in order to locate the primary content
const CONTENT_SELECTORS: &[&str] = &["main", "div.content", "article"];

/// Errors raised while extracting a document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Empty document for {url}")]
    EmptyDocument { url: String },
}

/// Structured content extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    /// Page title, or [`NO_TITLE`]
    pub title: String,

    /// Text of the primary content region
    pub text: String,

    /// `href` values of all anchors, in document order, unfiltered
    pub links: Vec<String>,

    /// `src` values of `<img>` elements
    pub images: Vec<String>,

    /// `href` values of stylesheet `<link>` elements
    pub stylesheets: Vec<String>,

    /// `src` values of `<script>` elements
    pub scripts: Vec<String>,
}

impl PageContent {
    /// Raw references for one asset kind
    pub fn assets(&self, kind: AssetKind) -> &[String] {
        match kind {
            AssetKind::Image => &self.images,
            AssetKind::Css => &self.stylesheets,
            AssetKind::Js => &self.scripts,
        }
    }

    /// The first [`SNIPPET_LENGTH`] characters of the text, with `...` when cut
    pub fn snippet(&self) -> String {
        snippet(&self.text)
    }
}

/// Extracts structured content from an HTML document
///
/// The HTML parser recovers from malformed markup, so the only failure is a
/// document with no content at all.
///
/// # Arguments
///
/// * `html` - The document text
/// * `page_url` - The URL the document was fetched from
///
/// # Example
///
/// ```
/// use site_harvest::crawler::extract;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let content = extract(html, &page_url).unwrap();
/// assert_eq!(content.title, "Test");
/// assert_eq!(content.links, vec!["/page"]);
/// ```
pub fn extract(html: &str, page_url: &Url) -> Result<PageContent, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::EmptyDocument {
            url: page_url.to_string(),
        });
    }

    let document = Html::parse_document(html);

    Ok(PageContent {
        title: extract_title(&document),
        text: extract_text(&document),
        links: collect_attr(&document, "a[href]", "href"),
        images: collect_attr(&document, "img[src]", "src"),
        stylesheets: collect_attr(&document, "link[rel~=\"stylesheet\"][href]", "href"),
        scripts: collect_attr(&document, "script[src]", "src"),
    })
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return NO_TITLE.to_string();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Extracts the text of the primary content region
fn extract_text(document: &Html) -> String {
    CONTENT_SELECTORS
        .iter()
        .chain(std::iter::once(&"body"))
        .filter_map(|selector| Selector::parse(selector).ok())
        .find_map(|selector| document.select(&selector).next().map(element_text))
        .unwrap_or_default()
}

/// Joins the trimmed, non-empty text nodes of an element with single spaces
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collects an attribute from every element matching a selector
fn collect_attr(document: &Html, selector: &str, attr: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .map(|value| value.to_string())
        .collect()
}

/// Truncates text to [`SNIPPET_LENGTH`] characters, appending `...` when cut
pub fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_LENGTH) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
