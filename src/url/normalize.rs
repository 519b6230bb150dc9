use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a raw link into the key used for deduplication
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Reject empty links, same-page anchors (`#...`) and `javascript:` links
/// 3. Resolve against `base` using standard relative-URL resolution
/// 4. Remove the query string and fragment
///
/// The result keeps scheme, authority and path only. Normalizing an already
/// normalized URL returns it unchanged.
///
/// # Arguments
///
/// * `raw_href` - The link as found in the document
/// * `base` - The URL of the page the link was found on
///
/// # Returns
///
/// * `Ok(String)` - Normalized absolute URL
/// * `Err(UrlError)` - The link is not crawlable or cannot be resolved
///
/// # Examples
///
/// ```
/// use site_harvest::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/").unwrap();
/// let url = normalize("post?id=3#comments", &base).unwrap();
/// assert_eq!(url, "https://example.com/blog/post");
/// ```
pub fn normalize(raw_href: &str, base: &Url) -> UrlResult<String> {
    let href = raw_href.trim();

    if href.is_empty() || href.starts_with('#') || is_script_link(href) {
        return Err(UrlError::NotCrawlable(raw_href.to_string()));
    }

    let mut url = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    url.set_query(None);
    url.set_fragment(None);

    Ok(url.to_string())
}

/// Normalizes a URL that is already absolute (e.g. a seed URL)
pub fn normalize_absolute(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

/// Checks for the `javascript:` pseudo-scheme, ignoring case
fn is_script_link(href: &str) -> bool {
    href.get(..11)
        .map_or(false, |scheme| scheme.eq_ignore_ascii_case("javascript:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_resolve_relative_path() {
        let result = normalize("other", &base_url()).unwrap();
        assert_eq!(result, "https://example.com/docs/other");
    }

    #[test]
    fn test_resolve_root_relative() {
        let result = normalize("/about", &base_url()).unwrap();
        assert_eq!(result, "https://example.com/about");
    }

    #[test]
    fn test_resolve_parent_directory() {
        let result = normalize("../contact", &base_url()).unwrap();
        assert_eq!(result, "https://example.com/contact");
    }

    #[test]
    fn test_absolute_link_kept() {
        let result = normalize("https://other.org/x", &base_url()).unwrap();
        assert_eq!(result, "https://other.org/x");
    }

    #[test]
    fn test_strip_query_and_fragment() {
        let result = normalize("/page?a=1&b=2#section", &base_url()).unwrap();
        assert_eq!(result, "https://example.com/page");
    }

    #[test]
    fn test_bare_host_gets_root_path() {
        let result = normalize("https://example.com", &base_url()).unwrap();
        assert_eq!(result, "https://example.com/");
    }

    #[test]
    fn test_port_is_kept() {
        let result = normalize("http://127.0.0.1:8080/a?x=1", &base_url()).unwrap();
        assert_eq!(result, "http://127.0.0.1:8080/a");
    }

    #[test]
    fn test_reject_empty() {
        assert!(matches!(
            normalize("", &base_url()),
            Err(UrlError::NotCrawlable(_))
        ));
        assert!(matches!(
            normalize("   ", &base_url()),
            Err(UrlError::NotCrawlable(_))
        ));
    }

    #[test]
    fn test_reject_fragment_only() {
        assert!(matches!(
            normalize("#top", &base_url()),
            Err(UrlError::NotCrawlable(_))
        ));
    }

    #[test]
    fn test_reject_javascript() {
        assert!(matches!(
            normalize("javascript:void(0)", &base_url()),
            Err(UrlError::NotCrawlable(_))
        ));
        assert!(matches!(
            normalize("JavaScript:alert(1)", &base_url()),
            Err(UrlError::NotCrawlable(_))
        ));
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "/a/b/../c?q=1#f",
            "https://example.com",
            "relative/path/",
            "//cdn.example.com/lib.js?v=2",
            "mailto:someone@example.com",
            "/%7Euser/page",
        ];

        for input in inputs {
            let once = normalize(input, &base_url()).unwrap();
            let base = Url::parse("https://unrelated.net/x/y").unwrap();
            let twice = normalize(&once, &base).unwrap();
            assert_eq!(once, twice, "normalize is not idempotent for {}", input);
        }
    }

    #[test]
    fn test_normalize_absolute() {
        let url = Url::parse("https://example.com?x=1#frag").unwrap();
        assert_eq!(normalize_absolute(&url), "https://example.com/");
    }
}
