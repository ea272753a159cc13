//! Output module for run summaries and dataset reports
//!
//! This module handles:
//! - Generating markdown summaries of a completed run
//! - Computing and printing statistics over the persisted dataset

mod markdown;
pub mod stats;

pub use markdown::{format_run_summary, write_run_summary};
pub use stats::{dataset_statistics, print_statistics, DatasetStatistics};
