/// Post records and per-card extraction outcomes
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One blog entry scraped from a council member's blog
///
/// The permalink is the only identity: two posts with the same permalink are
/// the same post regardless of any other field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Short display id derived from the permalink path
    pub id: String,

    /// Identifier of the owning source
    #[serde(rename = "alderId")]
    pub source_id: u32,

    pub title: String,

    /// Absolute permalink URL
    #[serde(rename = "url")]
    pub permalink: String,

    /// Publish timestamp; the ordering key
    #[serde(rename = "date", with = "published_format")]
    pub published: DateTime<FixedOffset>,

    #[serde(default)]
    pub body_preview: String,

    #[serde(default)]
    pub categories: Vec<String>,

    /// When this record was captured
    pub scraped_at: DateTime<Utc>,
}

/// Why a candidate card was not materialized into a post
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("missing title link")]
    MissingTitleLink,

    #[error("empty title")]
    EmptyTitle,

    #[error("missing permalink")]
    MissingPermalink,

    #[error("permalink '{0}' could not be resolved")]
    InvalidPermalink(String),

    #[error("missing publish timestamp")]
    MissingTimestamp,

    #[error("unparseable publish timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Result of validating one candidate card
#[derive(Debug, Clone, PartialEq)]
pub enum CardOutcome {
    Accepted(Post),
    Rejected {
        /// Zero-based position of the card on its page
        index: usize,
        reason: RejectReason,
    },
}

impl CardOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn into_post(self) -> Option<Post> {
        match self {
            Self::Accepted(post) => Some(post),
            Self::Rejected { .. } => None,
        }
    }
}

/// Parses a publish timestamp as found in a `datetime` attribute
///
/// Accepts RFC 3339 date-times, offset-less `YYYY-MM-DDTHH:MM:SS[.fff]` and
/// bare `YYYY-MM-DD` dates. The latter two are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().fixed_offset());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Serializes publish timestamps as RFC 3339 and reads them back leniently,
/// so datasets written by earlier tooling with bare dates still load.
mod published_format {
    use super::parse_timestamp;
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid publish timestamp '{}'", raw)))
    }
}
