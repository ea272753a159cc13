//! Storage module for persisting the post dataset
//!
//! This module handles reading and writing the dataset document consumed by
//! the presentation layer:
//! - Loading the previous dataset once at run start (absent file = empty)
//! - Replacing it atomically once at run end

mod json;
mod traits;

pub use json::JsonStore;
pub use traits::{DatasetStore, StorageError, StorageResult};
