//! JSON file dataset store
//!
//! The dataset is written pretty-printed to a sibling temp file, synced, and
//! renamed over the target so readers never observe a truncated document.

use crate::model::Dataset;
use crate::storage::traits::{DatasetStore, StorageError, StorageResult};
use chrono::Utc;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Dataset stored as a single JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.display_path(),
            source,
        }
    }

    /// Sibling of the target with `suffix` appended to the file name
    fn sibling_path(&self, suffix: &str) -> StorageResult<PathBuf> {
        let mut name = self
            .path
            .file_name()
            .ok_or_else(|| StorageError::Malformed {
                path: self.display_path(),
                message: "dataset path has no file name".to_string(),
            })?
            .to_os_string();
        name.push(suffix);
        Ok(self.path.with_file_name(name))
    }

    /// Temp file next to the target, so the final rename stays on one filesystem
    fn temp_path(&self) -> StorageResult<PathBuf> {
        self.sibling_path(".tmp")
    }
}

impl DatasetStore for JsonStore {
    fn load(&self) -> StorageResult<Dataset> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No dataset at {}, starting empty", self.display_path());
                return Ok(Dataset::empty());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&content).map_err(|e| StorageError::Malformed {
            path: self.display_path(),
            message: e.to_string(),
        })
    }

    fn save(&self, dataset: &Dataset) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(dataset)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let temp = self.temp_path()?;
        let written = write_synced(&temp, json.as_bytes()).and_then(|_| fs::rename(&temp, &self.path));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp);
            return Err(self.io_error(e));
        }

        tracing::debug!(path = %self.display_path(), posts = dataset.len(), "Dataset written");
        Ok(())
    }

    fn set_aside(&self) -> StorageResult<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let suffix = format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3f"));
        let target = self.sibling_path(&suffix)?;
        fs::rename(&self.path, &target).map_err(|e| self.io_error(e))?;

        tracing::warn!(
            path = %self.display_path(),
            kept_at = %target.display(),
            "Unreadable dataset moved aside"
        );
        Ok(Some(target))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
