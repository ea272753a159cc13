//! Scrape coordinator - main run orchestration logic
//!
//! This module drives a complete run:
//! - Loading the previously persisted dataset
//! - Walking every configured source in roster order, one at a time
//! - Merging newly scraped posts into the dataset
//! - Persisting the dataset with fresh run metadata

use crate::config::{Config, Source};
use crate::crawler::extractor::MarkupSchema;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::scheduler::Pacing;
use crate::crawler::walker::{SourceReport, SourceWalker};
use crate::merge::merge_posts;
use crate::model::{Dataset, Post, RunMetadata};
use crate::storage::DatasetStore;
use crate::FeedError;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;

/// Posts and failures gathered across every source
#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    /// All posts in roster-then-page-then-card order
    pub posts: Vec<Post>,

    /// Sources that produced zero posts, in roster order
    pub failed_sources: Vec<u32>,

    pub reports: Vec<SourceReport>,
}

/// Outcome of one complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Metadata as persisted with the dataset
    pub metadata: RunMetadata,

    /// Posts loaded from the previous dataset
    pub previous_posts: usize,

    /// Scraped posts discarded because their permalink was already known
    pub duplicates: usize,

    pub reports: Vec<SourceReport>,
}

/// Main scrape coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    schema: MarkupSchema,
    pacing: Pacing,
}

impl Coordinator {
    /// Creates a new coordinator with pacing taken from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(FeedError)` - Selector compilation or HTTP client setup failed
    pub fn new(config: Config) -> Result<Self, FeedError> {
        let schema = MarkupSchema::from_config(&config.markup)?;
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.scraper.request_timeout_secs),
        )?;
        let pacing = Pacing::from_config(&config.scraper);

        Ok(Self {
            config,
            client,
            schema,
            pacing,
        })
    }

    /// Replaces the pacing policy
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn sources(&self) -> &[Source] {
        &self.config.sources
    }

    /// Walks every source sequentially and collects their posts
    ///
    /// A source with zero posts lands in `failed_sources` whether its first
    /// page failed or it simply had nothing parseable.
    pub async fn scrape_all(&self) -> AggregateResult {
        tracing::info!("Starting scrape of {} sources", self.config.sources.len());

        let walker = SourceWalker::new(
            &self.client,
            &self.schema,
            &self.config.site,
            self.pacing,
            self.config.scraper.max_pages_per_source,
        );

        let mut result = AggregateResult::default();

        for (position, source) in self.config.sources.iter().enumerate() {
            self.pacing.before_source(position).await;

            let report = walker.walk(source).await;
            if report.posts.is_empty() {
                result.failed_sources.push(source.id);
            }
            result.posts.extend(report.posts.iter().cloned());
            result.reports.push(report);
        }

        if result.failed_sources.is_empty() {
            tracing::info!("Scrape complete: {} posts, no failed sources", result.posts.len());
        } else {
            tracing::warn!(
                "Scrape complete: {} posts, failed sources: {:?}",
                result.posts.len(),
                result.failed_sources
            );
        }

        result
    }

    /// Runs load -> scrape -> merge -> persist
    ///
    /// An unreadable previous dataset is moved aside and the run starts empty.
    /// Failing to move it aside or to write the new dataset is an error.
    pub async fn run(&self, store: &dyn DatasetStore) -> Result<RunSummary, FeedError> {
        let existing = match store.load() {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::warn!("Could not read previous dataset, starting empty: {}", e);
                store.set_aside()?;
                Dataset::empty()
            }
        };
        let previous_posts = existing.len();
        tracing::info!("Loaded {} existing posts", previous_posts);

        let aggregate = self.scrape_all().await;
        let scraped = aggregate.posts.len();

        let merged = merge_posts(existing.posts, aggregate.posts);

        let metadata = RunMetadata {
            total_posts: merged.posts.len(),
            new_posts: merged.new_posts,
            failed_sources: aggregate.failed_sources,
            completed_at: Utc::now(),
        };

        let dataset = Dataset {
            posts: merged.posts,
            metadata: Some(metadata.clone()),
        };
        store.save(&dataset)?;

        tracing::info!(
            new_posts = metadata.new_posts,
            total_posts = metadata.total_posts,
            "Dataset saved"
        );

        Ok(RunSummary {
            metadata,
            previous_posts,
            duplicates: scraped - merged.new_posts,
            reports: aggregate.reports,
        })
    }
}
