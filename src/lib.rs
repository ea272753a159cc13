//! Council-Feed: a polite aggregator for council-member blogs
//!
//! This crate walks every configured council-member blog page by page,
//! extracts post cards from the markup, merges them into a persisted dataset
//! without ever rewriting an already-stored post, and records run metadata
//! for the presentation layer that reads the dataset.

pub mod config;
pub mod crawler;
pub mod merge;
pub mod model;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Council-Feed operations
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Duplicate source id: {0}")]
    DuplicateSource(u32),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL cannot serve as a base: {0}")]
    CannotBeBase(String),
}

/// Result type alias for Council-Feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, Source};
pub use model::{CardOutcome, Dataset, Post, RejectReason, RunMetadata};
