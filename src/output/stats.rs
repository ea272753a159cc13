//! Statistics over the persisted dataset
//!
//! This module provides functionality for summarizing a dataset and
//! displaying the summary on stdout.

use crate::config::Source;
use crate::model::{Dataset, RunMetadata};
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;

/// Dataset statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStatistics {
    /// Total number of stored posts
    pub total_posts: usize,

    /// Post count per source id
    pub posts_by_source: BTreeMap<u32, usize>,

    /// Oldest publish timestamp in the dataset
    pub oldest: Option<DateTime<FixedOffset>>,

    /// Newest publish timestamp in the dataset
    pub newest: Option<DateTime<FixedOffset>>,

    /// Distinct category labels and how many posts carry them
    pub categories: BTreeMap<String, usize>,

    /// Metadata of the last run that wrote the dataset
    pub last_run: Option<RunMetadata>,
}

/// Computes statistics for a dataset
pub fn dataset_statistics(dataset: &Dataset) -> DatasetStatistics {
    let mut posts_by_source = BTreeMap::new();
    let mut categories = BTreeMap::new();

    for post in &dataset.posts {
        *posts_by_source.entry(post.source_id).or_insert(0) += 1;
        for category in &post.categories {
            *categories.entry(category.clone()).or_insert(0) += 1;
        }
    }

    DatasetStatistics {
        total_posts: dataset.len(),
        posts_by_source,
        oldest: dataset.posts.iter().map(|p| p.published).min(),
        newest: dataset.posts.iter().map(|p| p.published).max(),
        categories,
        last_run: dataset.metadata.clone(),
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `sources` - The roster, used to label source ids with names
pub fn print_statistics(stats: &DatasetStatistics, sources: &[Source]) {
    println!("=== Dataset Statistics ===\n");

    println!("Overview:");
    println!("  Total posts: {}", stats.total_posts);
    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        println!(
            "  Published between: {} and {}",
            oldest.format("%Y-%m-%d"),
            newest.format("%Y-%m-%d")
        );
    }
    println!("  Distinct categories: {}", stats.categories.len());
    println!();

    println!("Posts by Source:");
    for source in sources {
        let count = stats.posts_by_source.get(&source.id).copied().unwrap_or(0);
        println!("  {:>3} {:<32} {}", source.id, source.name, count);
    }
    for (id, count) in &stats.posts_by_source {
        if !sources.iter().any(|s| s.id == *id) {
            println!("  {:>3} {:<32} {}", id, "(not in roster)", count);
        }
    }
    println!();

    match &stats.last_run {
        Some(run) => {
            println!("Last Run:");
            println!("  Completed: {}", run.completed_at.to_rfc3339());
            println!("  New posts: {}", run.new_posts);
            if run.failed_sources.is_empty() {
                println!("  Failed sources: none");
            } else {
                println!("  Failed sources: {:?}", run.failed_sources);
            }
        }
        None => println!("No run metadata recorded yet"),
    }
}
