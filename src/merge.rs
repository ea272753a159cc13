//! Incremental merge of scraped posts into the persisted set
//!
//! Identity is the permalink and nothing else: a scraped post whose permalink
//! is already stored is dropped, even if its title or body changed upstream.
//! Ordering is publish time descending, ties broken by arrival order
//! (new posts first, then stored posts, each in their original order).

use crate::model::Post;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Result of merging a scrape into the stored dataset
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Combined posts, newest first
    pub posts: Vec<Post>,

    /// How many scraped posts were not already stored
    pub new_posts: usize,
}

/// Merges newly scraped posts into the stored posts
///
/// Scraped posts are deduplicated against the stored set and among
/// themselves (first occurrence wins). Stored posts are never modified.
pub fn merge_posts(existing: Vec<Post>, scraped: Vec<Post>) -> MergeOutcome {
    let mut seen = HashSet::with_capacity(existing.len() + scraped.len());

    let existing: Vec<Post> = existing
        .into_iter()
        .filter(|post| seen.insert(post.permalink.clone()))
        .collect();

    let fresh: Vec<Post> = scraped
        .into_iter()
        .filter(|post| seen.insert(post.permalink.clone()))
        .collect();

    let new_posts = fresh.len();

    let mut combined = fresh;
    combined.extend(existing);

    MergeOutcome {
        posts: order_newest_first(combined),
        new_posts,
    }
}

/// Sorts posts by publish time descending, keeping arrival order on ties
///
/// The arrival index is part of the sort key, so the result does not depend on
/// the stability of the underlying sort.
pub fn order_newest_first(posts: Vec<Post>) -> Vec<Post> {
    let mut keyed: Vec<(usize, Post)> = posts.into_iter().enumerate().collect();
    keyed.sort_unstable_by_key(|(arrival, post)| (Reverse(post.published), *arrival));
    keyed.into_iter().map(|(_, post)| post).collect()
}
