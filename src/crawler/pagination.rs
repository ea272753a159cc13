//! Pagination discovery from a listing page's pager
//!
//! The pager's "last page" link carries a zero-based `page` query parameter.
//! Total pages is that index plus one. Anything unexpected (no pager, no
//! href, non-numeric index) degrades to a single page.

use crate::url::PAGE_PARAM;
use scraper::{Html, Selector};
use url::Url;

/// Resolves the total page count of a source from its first page
///
/// # Arguments
///
/// * `document` - The parsed first listing page
/// * `last_page_link` - Selector for the pager's "last page" anchor
/// * `page_url` - URL the document was fetched from (base for relative hrefs)
///
/// # Returns
///
/// The number of pages, always >= 1
pub fn resolve_total_pages(document: &Html, last_page_link: &Selector, page_url: &Url) -> u32 {
    let href = document
        .select(last_page_link)
        .next()
        .and_then(|element| element.value().attr("href"));

    match href {
        Some(href) => last_page_index(href, page_url).saturating_add(1),
        None => 1,
    }
}

/// Reads the zero-based page index out of a pager href
///
/// Returns 0 when the href cannot be resolved or carries no numeric `page`.
pub fn last_page_index(href: &str, page_url: &Url) -> u32 {
    page_url
        .join(href.trim())
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == PAGE_PARAM)
                .and_then(|(_, value)| value.trim().parse::<u32>().ok())
        })
        .unwrap_or(0)
}
