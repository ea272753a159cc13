//! Data model for scraped posts and the persisted dataset
//!
//! # Components
//!
//! - `Post`: one materialized blog entry, identified by its permalink
//! - `CardOutcome`: the per-card result of extraction (accepted or rejected with a reason)
//! - `Dataset` / `RunMetadata`: the persisted document read by the presentation layer

mod dataset;
mod post;

pub use dataset::{Dataset, RunMetadata};
pub use post::{parse_timestamp, CardOutcome, Post, RejectReason};
