//! Source walker - all pages of one council member's blog
//!
//! State flow per source:
//!
//! ```text
//! start -> fetch first page -> resolve page count -> fetch remaining pages -> done
//!              |                                          |
//!              +-- failure: source failed, zero posts     +-- failure: page skipped
//! ```

use crate::config::{SiteConfig, Source};
use crate::crawler::extractor::{extract_posts, MarkupSchema, PageExtraction, SourceContext};
use crate::crawler::fetcher::{fetch_page, FetchError, FetchedPage};
use crate::crawler::pagination::resolve_total_pages;
use crate::crawler::scheduler::Pacing;
use crate::model::Post;
use crate::url::{page_url, parse_http_url, site_root};
use crate::UrlResult;
use chrono::Utc;
use reqwest::Client;
use scraper::Html;
use url::Url;

/// How a source's walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// First page fetched; later pages may still have failed individually
    Completed,

    /// The source could not be walked at all
    Failed { reason: String },
}

/// A listing page that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page: u32,
    pub reason: String,
    pub status_code: Option<u16>,
}

/// Result of walking one source
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source_id: u32,

    /// Posts in page-then-card order
    pub posts: Vec<Post>,

    /// Pages the walker planned to fetch (after clamping)
    pub pages_total: u32,

    /// Pages successfully fetched
    pub pages_fetched: u32,

    pub failed_pages: Vec<PageFailure>,

    /// Cards skipped as malformed across all pages
    pub rejected_cards: usize,

    pub status: SourceStatus,
}

impl SourceReport {
    fn failed(source_id: u32, reason: String) -> Self {
        Self {
            source_id,
            posts: Vec::new(),
            pages_total: 0,
            pages_fetched: 0,
            failed_pages: Vec::new(),
            rejected_cards: 0,
            status: SourceStatus::Failed { reason },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SourceStatus::Failed { .. })
    }
}

/// Walks the paginated blog of a single source
pub struct SourceWalker<'a> {
    client: &'a Client,
    schema: &'a MarkupSchema,
    site: &'a SiteConfig,
    pacing: Pacing,
    max_pages: u32,
}

impl<'a> SourceWalker<'a> {
    pub fn new(
        client: &'a Client,
        schema: &'a MarkupSchema,
        site: &'a SiteConfig,
        pacing: Pacing,
        max_pages: u32,
    ) -> Self {
        Self {
            client,
            schema,
            site,
            pacing,
            max_pages: max_pages.max(1),
        }
    }

    /// Fetches every page of `source` and collects its posts
    ///
    /// Never fails: a first-page failure yields a `Failed` report with zero
    /// posts, a later-page failure is recorded and the walk continues.
    pub async fn walk(&self, source: &Source) -> SourceReport {
        tracing::info!(source_id = source.id, name = %source.name, "Walking {}", source.blog_url);

        let (blog_url, context) = match self.prepare(source) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::warn!(source_id = source.id, "Invalid blog URL: {}", e);
                return SourceReport::failed(source.id, e.to_string());
            }
        };

        let first_url = page_url(&blog_url, 0);
        let first_page = match fetch_page(self.client, &first_url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(source_id = source.id, url = %first_url, "First page failed: {}", e);
                return SourceReport::failed(source.id, e.to_string());
            }
        };

        let (extraction, discovered_pages) = self.parse_first_page(&first_page, &context);
        let pages_total = if discovered_pages > self.max_pages {
            tracing::warn!(
                source_id = source.id,
                "Pager reports {} pages, capping at {}",
                discovered_pages,
                self.max_pages
            );
            self.max_pages
        } else {
            discovered_pages
        };
        tracing::info!(source_id = source.id, "Found {} page(s)", pages_total);

        let mut report = SourceReport {
            source_id: source.id,
            posts: Vec::new(),
            pages_total,
            pages_fetched: 1,
            failed_pages: Vec::new(),
            rejected_cards: 0,
            status: SourceStatus::Completed,
        };
        absorb(&mut report, extraction);

        for index in 1..pages_total {
            self.pacing.before_page(index).await;

            let url = page_url(&blog_url, index);
            match self.fetch_listing(&url, &context).await {
                Ok(extraction) => {
                    report.pages_fetched += 1;
                    absorb(&mut report, extraction);
                }
                Err(e) => {
                    tracing::warn!(source_id = source.id, page = index, "Page {} failed: {}", index, e);
                    report.failed_pages.push(PageFailure {
                        page: index,
                        reason: e.to_string(),
                        status_code: e.status_code(),
                    });
                }
            }
        }

        tracing::info!(
            source_id = source.id,
            posts = report.posts.len(),
            rejected = report.rejected_cards,
            failed_pages = report.failed_pages.len(),
            "Scraped {} posts",
            report.posts.len()
        );

        report
    }

    fn prepare(&self, source: &Source) -> UrlResult<(Url, SourceContext)> {
        let blog_url = parse_http_url(&source.blog_url)?;
        let root = match &self.site.root_url {
            Some(root) => parse_http_url(root)?,
            None => site_root(&blog_url)?,
        };

        let context = SourceContext {
            source_id: source.id,
            site_root: root,
            id_prefix: self.site.post_id_prefix.clone(),
            id_skip_segments: self.site.post_id_skip_segments.clone(),
        };

        Ok((blog_url, context))
    }

    /// Extracts posts and the page count from the same first-page document
    fn parse_first_page(
        &self,
        page: &FetchedPage,
        context: &SourceContext,
    ) -> (PageExtraction, u32) {
        let document = Html::parse_document(&page.body);
        let extraction = extract_posts(&document, self.schema, context, Utc::now());
        let total = resolve_total_pages(&document, &self.schema.last_page_link, &page.final_url);
        (extraction, total)
    }

    async fn fetch_listing(
        &self,
        url: &Url,
        context: &SourceContext,
    ) -> Result<PageExtraction, FetchError> {
        let page = fetch_page(self.client, url).await?;
        let document = Html::parse_document(&page.body);
        Ok(extract_posts(&document, self.schema, context, Utc::now()))
    }
}

fn absorb(report: &mut SourceReport, extraction: PageExtraction) {
    report.rejected_cards += extraction.rejected_count();
    report.posts.extend(extraction.into_posts());
}
