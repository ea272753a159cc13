//! Permalink resolution and short-id generation

use url::Url;

/// Connector that replaces path separators in generated ids
const ID_CONNECTOR: char = '-';

/// Resolves a card's permalink href against the site root
///
/// Relative hrefs are joined onto the root; absolute hrefs pass through.
/// Returns None for empty hrefs, fragment-only links, and non-http(s) results.
///
/// # Example
///
/// ```
/// use council_feed::url::resolve_permalink;
/// use url::Url;
///
/// let root = Url::parse("https://example.org").unwrap();
/// let url = resolve_permalink(&root, "/council/district2/blog/2026/01/15/meeting-recap").unwrap();
/// assert_eq!(url.as_str(), "https://example.org/council/district2/blog/2026/01/15/meeting-recap");
/// ```
pub fn resolve_permalink(root: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = root.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// Derives the short display id from a permalink path
///
/// Strips `prefix` when present, drops empty segments and any segment listed
/// in `skip_segments`, then joins what is left with `-`. The result never
/// starts or ends with a connector.
///
/// # Example
///
/// ```
/// use council_feed::url::generate_post_id;
///
/// let skip = vec!["blog".to_string()];
/// let id = generate_post_id("/council/district2/blog/2026/01/15/meeting-recap", "/council/", &skip);
/// assert_eq!(id, "district2-2026-01-15-meeting-recap");
/// ```
pub fn generate_post_id(path: &str, prefix: &str, skip_segments: &[String]) -> String {
    let stripped = path.strip_prefix(prefix).unwrap_or(path);

    stripped
        .split('/')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| !skip_segments.iter().any(|skip| skip == segment))
        .collect::<Vec<_>>()
        .join(&ID_CONNECTOR.to_string())
        .trim_matches(ID_CONNECTOR)
        .to_string()
}
