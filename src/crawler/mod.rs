//! Crawler module for blog scraping
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with typed failures
//! - Post extraction and pagination discovery from listing markup
//! - Politeness pacing between pages and sources
//! - Per-source walking and overall run coordination

mod coordinator;
mod extractor;
mod fetcher;
mod pagination;
mod scheduler;
mod walker;

pub use coordinator::{AggregateResult, Coordinator, RunSummary};
pub use extractor::{
    extract_posts, extract_posts_from_html, MarkupSchema, PageExtraction, SourceContext,
};
pub use fetcher::{build_http_client, fetch_page, FetchError, FetchedPage};
pub use pagination::{last_page_index, resolve_total_pages};
pub use scheduler::Pacing;
pub use walker::{PageFailure, SourceReport, SourceStatus, SourceWalker};

use crate::config::Config;
use crate::output::write_run_summary;
use crate::storage::JsonStore;
use crate::FeedError;
use std::path::Path;

/// Runs a complete scrape
///
/// This is the main entry point for a scheduled run. It will:
/// 1. Load the dataset at `output.dataset-path`
/// 2. Walk every source with the configured pacing
/// 3. Merge and persist the dataset
/// 4. Write the markdown run summary, when configured
///
/// # Returns
///
/// * `Ok(RunSummary)` - Run completed, possibly with failed sources
/// * `Err(FeedError)` - The dataset could not be written
///
/// A summary that cannot be written is logged and does not fail the run.
pub async fn scrape(config: Config) -> Result<RunSummary, FeedError> {
    let store = JsonStore::new(&config.output.dataset_path);
    let summary_path = config.output.summary_path.clone();

    let coordinator = Coordinator::new(config)?;
    let summary = coordinator.run(&store).await?;

    if let Some(path) = summary_path {
        match write_run_summary(&summary, coordinator.sources(), Path::new(&path)) {
            Ok(()) => tracing::info!("Run summary written to {}", path),
            Err(e) => tracing::warn!("Could not write run summary to {}: {}", path, e),
        }
    }

    Ok(summary)
}
