//! Storage traits and error types
//!
//! This module defines the trait interface for dataset backends and
//! associated error types.

use crate::model::Dataset;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for dataset backend implementations
///
/// A run calls `load` once at start and `save` once at end. Concurrent runs
/// against the same backend are not supported.
pub trait DatasetStore {
    /// Reads the persisted dataset
    ///
    /// Returns an empty dataset when nothing has been persisted yet.
    fn load(&self) -> StorageResult<Dataset>;

    /// Replaces the persisted dataset as a whole
    ///
    /// Either the new dataset is fully persisted or the previous one is left intact.
    fn save(&self, dataset: &Dataset) -> StorageResult<()>;

    /// Moves an unreadable dataset out of the way so a later `save` cannot destroy it
    ///
    /// Returns where the old data now lives, or `None` when nothing was persisted.
    fn set_aside(&self) -> StorageResult<Option<PathBuf>>;
}
