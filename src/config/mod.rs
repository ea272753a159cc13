//! Configuration module for Council-Feed
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The configuration carries the source roster alongside pacing, output, and
//! markup settings.
//!
//! # Example
//!
//! ```no_run
//! use council_feed::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("council.toml")).unwrap();
//! println!("Scraping {} blogs", config.sources.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, MarkupConfig, OutputConfig, ScraperConfig, SiteConfig, Source, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
