//! Post extraction from blog listing markup
//!
//! The listing structure is described by a `MarkupSchema` (compiled CSS
//! selectors). Every candidate card is validated independently:
//!
//! **Required:** title link with non-empty text, permalink href, `datetime` attribute
//!
//! **Optional:** body preview (defaults to ""), category labels (defaults to none)
//!
//! A card missing a required field becomes `CardOutcome::Rejected` with the
//! reason; the remaining cards on the page are unaffected.

use crate::config::MarkupConfig;
use crate::model::{parse_timestamp, CardOutcome, Post, RejectReason};
use crate::url::{generate_post_id, resolve_permalink};
use crate::ConfigError;
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled selectors for the listing markup
#[derive(Debug, Clone)]
pub struct MarkupSchema {
    pub card: Selector,
    pub title_link: Selector,
    pub timestamp: Selector,
    pub body_preview: Selector,
    pub category: Selector,
    pub last_page_link: Selector,
}

impl MarkupSchema {
    /// Compiles every selector in the `[markup]` table
    pub fn from_config(config: &MarkupConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            card: compile(&config.card)?,
            title_link: compile(&config.title_link)?,
            timestamp: compile(&config.timestamp)?,
            body_preview: compile(&config.body_preview)?,
            category: compile(&config.category)?,
            last_page_link: compile(&config.last_page_link)?,
        })
    }
}

fn compile(raw: &str) -> Result<Selector, ConfigError> {
    Selector::parse(raw).map_err(|e| ConfigError::InvalidSelector {
        selector: raw.to_string(),
        message: format!("{:?}", e),
    })
}

/// Per-source settings needed to materialize a post
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub source_id: u32,

    /// Root that relative permalinks are resolved against
    pub site_root: Url,

    /// Prefix stripped from permalink paths when generating ids
    pub id_prefix: String,

    /// Path segments dropped when generating ids
    pub id_skip_segments: Vec<String>,
}

/// All card outcomes of one page, in document order
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    pub outcomes: Vec<CardOutcome>,
}

impl PageExtraction {
    pub fn card_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_accepted()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.card_count() - self.accepted_count()
    }

    /// Rejected cards with their positions
    pub fn rejections(&self) -> impl Iterator<Item = (usize, &RejectReason)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            CardOutcome::Rejected { index, reason } => Some((*index, reason)),
            CardOutcome::Accepted(_) => None,
        })
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.outcomes
            .into_iter()
            .filter_map(CardOutcome::into_post)
            .collect()
    }
}

/// Extracts every post card from a parsed listing page
///
/// # Arguments
///
/// * `document` - The parsed listing page
/// * `schema` - Compiled selectors for the listing structure
/// * `context` - Owning source and permalink settings
/// * `scraped_at` - Capture timestamp stamped onto every accepted post
pub fn extract_posts(
    document: &Html,
    schema: &MarkupSchema,
    context: &SourceContext,
    scraped_at: DateTime<Utc>,
) -> PageExtraction {
    let outcomes = document
        .select(&schema.card)
        .enumerate()
        .map(|(index, card)| match extract_card(card, schema, context, scraped_at) {
            Ok(post) => CardOutcome::Accepted(post),
            Err(reason) => {
                tracing::debug!(
                    source_id = context.source_id,
                    card = index,
                    %reason,
                    "Skipping malformed post card"
                );
                CardOutcome::Rejected { index, reason }
            }
        })
        .collect();

    PageExtraction { outcomes }
}

/// Convenience wrapper that parses raw HTML first
pub fn extract_posts_from_html(
    html: &str,
    schema: &MarkupSchema,
    context: &SourceContext,
    scraped_at: DateTime<Utc>,
) -> PageExtraction {
    let document = Html::parse_document(html);
    extract_posts(&document, schema, context, scraped_at)
}

/// Validates one card, then materializes it
fn extract_card(
    card: ElementRef<'_>,
    schema: &MarkupSchema,
    context: &SourceContext,
    scraped_at: DateTime<Utc>,
) -> Result<Post, RejectReason> {
    let link = card
        .select(&schema.title_link)
        .next()
        .ok_or(RejectReason::MissingTitleLink)?;

    let title = element_text(link);
    if title.is_empty() {
        return Err(RejectReason::EmptyTitle);
    }

    let href = link
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or(RejectReason::MissingPermalink)?;

    let permalink = resolve_permalink(&context.site_root, href)
        .ok_or_else(|| RejectReason::InvalidPermalink(href.to_string()))?;

    let raw_timestamp = card
        .select(&schema.timestamp)
        .find_map(|element| element.value().attr("datetime"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(RejectReason::MissingTimestamp)?;

    let published = parse_timestamp(raw_timestamp)
        .ok_or_else(|| RejectReason::InvalidTimestamp(raw_timestamp.to_string()))?;

    let body_preview = card
        .select(&schema.body_preview)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let categories = card
        .select(&schema.category)
        .map(element_text)
        .filter(|label| !label.is_empty())
        .collect();

    let id = generate_post_id(
        permalink.path(),
        &context.id_prefix,
        &context.id_skip_segments,
    );

    Ok(Post {
        id,
        source_id: context.source_id,
        title,
        permalink: permalink.to_string(),
        published,
        body_preview,
        categories,
        scraped_at,
    })
}

/// Concatenated text content, trimmed at both ends
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
