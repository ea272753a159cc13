use crate::model::Post;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing the run that last wrote the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    /// Post count after the merge
    pub total_posts: usize,

    /// Posts added by this run
    pub new_posts: usize,

    /// Sources that produced zero posts this run
    #[serde(rename = "failedDistricts", default)]
    pub failed_sources: Vec<u32>,

    /// Completion time of the run
    #[serde(rename = "lastScrapedAt")]
    pub completed_at: DateTime<Utc>,
}

/// The persisted document: every post ever observed plus the latest run metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub posts: Vec<Post>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RunMetadata>,
}

impl Dataset {
    /// A dataset with no posts and no run history
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
