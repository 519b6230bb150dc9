use crate::url::domain::domain_of;
use regex::Regex;

/// Path fragments that mark e-shop pages
const ESHOP_MARKERS: &[&str] = &["/e-shop/", "/eshop/", "/shop/"];

/// Path fragment that marks English-language pages
const ENGLISH_MARKER: &str = "/en/";

/// Rules deciding which discovered URLs are in scope for a crawl
#[derive(Debug, Clone)]
pub struct FilterPolicy {
    /// Domain (`host[:port]`) the crawl is restricted to
    pub domain: String,

    /// Reject e-shop URLs
    pub filter_eshop: bool,

    /// Reject English-language URLs
    pub filter_english: bool,

    /// When non-empty, a URL must match at least one of these
    pub include: Vec<Regex>,

    /// A URL matching any of these is rejected
    pub exclude: Vec<Regex>,
}

impl FilterPolicy {
    /// A policy that only restricts the domain
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            filter_eshop: false,
            filter_english: false,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

/// Decides whether a normalized URL should be filtered out of the crawl
///
/// Rules are evaluated in this order, stopping at the first match:
///
/// 1. Domain differs from the crawl domain (or the URL has no host)
/// 2. E-shop filtering is on and the URL contains `/e-shop/`, `/eshop/` or `/shop/`
/// 3. English filtering is on and the URL contains `/en/`
/// 4. Include patterns are set and none of them matches
/// 5. Exclude patterns are set and one of them matches
///
/// The marker checks in rules 2 and 3 are plain substring tests over the whole
/// URL, not locale-aware path segment matching.
///
/// # Examples
///
/// ```
/// use site_harvest::url::{should_filter, FilterPolicy};
///
/// let mut policy = FilterPolicy::for_domain("example.com");
/// policy.filter_eshop = true;
///
/// assert!(should_filter("https://example.com/eshop/item", &policy));
/// assert!(should_filter("https://other.com/page", &policy));
/// assert!(!should_filter("https://example.com/about", &policy));
/// ```
pub fn should_filter(url: &str, policy: &FilterPolicy) -> bool {
    if domain_of(url).as_deref() != Some(policy.domain.as_str()) {
        return true;
    }

    if policy.filter_eshop && ESHOP_MARKERS.iter().any(|marker| url.contains(marker)) {
        return true;
    }

    if policy.filter_english && url.contains(ENGLISH_MARKER) {
        return true;
    }

    if !policy.include.is_empty() && !policy.include.iter().any(|re| re.is_match(url)) {
        return true;
    }

    if policy.exclude.iter().any(|re| re.is_match(url)) {
        return true;
    }

    false
}
