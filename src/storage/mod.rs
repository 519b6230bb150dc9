//! Storage module for persisting scraped content
//!
//! This module handles writing crawl artifacts to disk:
//! - HTML documents, laid out after the URL path
//! - Downloaded images, stylesheets and scripts, grouped per page
//!
//! The [`Store`] trait is the seam the engine talks to; [`FileStore`] is the
//! filesystem implementation.

mod fs;
mod traits;

pub use fs::FileStore;
pub use traits::{Store, StorageError, StorageResult};

use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Kinds of page resources that can be downloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    Css,
    Js,
}

impl AssetKind {
    /// Every asset kind, in report order
    pub const ALL: [AssetKind; 3] = [AssetKind::Image, AssetKind::Css, AssetKind::Js];

    /// Prefix used for synthesized file names (`image_3.jpg`)
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Css => "css",
            Self::Js => "js",
        }
    }

    /// Extension used for synthesized file names
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Image => "jpg",
            Self::Css => "css",
            Self::Js => "js",
        }
    }

    /// Extensions accepted as belonging to this kind
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Image => &[
                "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico", "avif", "tif", "tiff",
            ],
            Self::Css => &["css"],
            Self::Js => &["js", "mjs"],
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Image => "image",
            Self::Css => "CSS",
            Self::Js => "JS",
        };
        f.write_str(name)
    }
}

/// Computes where a document for `url` lives below `root`
///
/// All path segments but the last become directories. The last segment is
/// the file name (`index` when the path is empty), with `.html` appended
/// unless it already ends that way.
///
/// # Examples
///
/// ```
/// use site_harvest::storage::document_path;
/// use std::path::Path;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/blog/post").unwrap();
/// assert_eq!(
///     document_path(Path::new("out"), &url),
///     Path::new("out/blog/post.html")
/// );
/// ```
pub fn document_path(root: &Path, url: &Url) -> PathBuf {
    let segments = path_segments(url);

    let mut path = root.to_path_buf();
    if let Some((_, parents)) = segments.split_last() {
        path.extend(parents);
    }

    let name = segments.last().copied().unwrap_or("index");
    if name.ends_with(".html") {
        path.push(name);
    } else {
        path.push(format!("{}.html", name));
    }
    path
}

/// Name of the per-page asset directory: the last path segment or `index`
pub fn page_dir_name(url: &Url) -> String {
    path_segments(url)
        .last()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "index".to_string())
}

/// Non-empty path segments, with `.` and `..` dropped so nothing escapes the root
fn path_segments(url: &Url) -> Vec<&str> {
    let trimmed = url.path().trim_matches('/');
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_root_becomes_index() {
        assert_eq!(
            document_path(Path::new("out"), &url("https://example.com/")),
            Path::new("out/index.html")
        );
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(
            document_path(Path::new("out"), &url("https://example.com/about")),
            Path::new("out/about.html")
        );
    }

    #[test]
    fn test_nested_segments() {
        assert_eq!(
            document_path(Path::new("out"), &url("https://example.com/a/b/c")),
            Path::new("out/a/b/c.html")
        );
    }

    #[test]
    fn test_trailing_slash_uses_last_segment() {
        assert_eq!(
            document_path(Path::new("out"), &url("https://example.com/blog/")),
            Path::new("out/blog.html")
        );
    }

    #[test]
    fn test_existing_html_extension_kept() {
        assert_eq!(
            document_path(Path::new("out"), &url("https://example.com/docs/page.html")),
            Path::new("out/docs/page.html")
        );
    }

    #[test]
    fn test_other_extension_gets_html_appended() {
        assert_eq!(
            document_path(Path::new("out"), &url("https://example.com/page.php")),
            Path::new("out/page.php.html")
        );
    }

    #[test]
    fn test_page_dir_name() {
        assert_eq!(page_dir_name(&url("https://example.com/")), "index");
        assert_eq!(page_dir_name(&url("https://example.com/a/gallery")), "gallery");
        assert_eq!(page_dir_name(&url("https://example.com/a/gallery/")), "gallery");
    }

    #[test]
    fn test_asset_kind_names() {
        assert_eq!(AssetKind::Image.prefix(), "image");
        assert_eq!(AssetKind::Css.default_extension(), "css");
        assert!(AssetKind::Js.extensions().contains(&"mjs"));
        assert_eq!(AssetKind::Css.to_string(), "CSS");
    }
}
