//! URL handling module for Council-Feed
//!
//! This module builds paginated listing URLs, derives the site root that
//! relative permalinks are resolved against, and turns permalinks into
//! short display ids.

mod permalink;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use permalink::{generate_post_id, resolve_permalink};

/// Query parameter carrying the zero-based page index
pub const PAGE_PARAM: &str = "page";

/// Parses a URL that must be usable as an http(s) base
pub fn parse_http_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}

/// Returns the origin of a blog URL (`scheme://host[:port]`)
///
/// # Examples
///
/// ```
/// use council_feed::url::site_root;
/// use url::Url;
///
/// let blog = Url::parse("https://example.org/council/district2/blog").unwrap();
/// assert_eq!(site_root(&blog).unwrap().as_str(), "https://example.org/");
/// ```
pub fn site_root(blog_url: &Url) -> UrlResult<Url> {
    let origin = blog_url.origin();
    if !origin.is_tuple() {
        return Err(UrlError::CannotBeBase(blog_url.to_string()));
    }

    Url::parse(&origin.ascii_serialization())
        .map_err(|e| UrlError::Parse(format!("{}: {}", blog_url, e)))
}

/// Builds the URL of listing page `index`
///
/// Page 0 is the blog root itself; later pages carry `?page=N`.
pub fn page_url(blog_url: &Url, index: u32) -> Url {
    if index == 0 {
        return blog_url.clone();
    }

    let mut url = blog_url.clone();
    url.query_pairs_mut()
        .append_pair(PAGE_PARAM, &index.to_string());
    url
}
