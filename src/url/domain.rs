use url::Url;

/// Extracts the domain (authority) from a URL
///
/// Returns the lowercase host followed by `:port` when the URL carries a
/// non-default port, so `http://127.0.0.1:8080/` and `http://127.0.0.1/`
/// are different domains. URLs without a host (e.g. `mailto:`) yield `None`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://localhost:3000/").unwrap();
/// assert_eq!(extract_domain(&url), Some("localhost:3000".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Extracts the domain from a URL string, `None` if it does not parse
pub fn domain_of(url: &str) -> Option<String> {
    Url::parse(url).ok().as_ref().and_then(extract_domain)
}
