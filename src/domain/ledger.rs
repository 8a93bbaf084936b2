//! The processed-videos ledger: the job's only persisted state.
//!
//! On the wire it is a flat JSON object mapping each source video key to the
//! ISO-8601 last-modified timestamp it had when its stills were produced:
//!
//! ```json
//! {
//!   "videos/trip1.mp4": "2024-05-01T10:20:30+00:00"
//! }
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A validated ISO-8601 timestamp, kept as the exact string it was read as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProcessedAt(String);

impl ProcessedAt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<DateTime<Utc>> for ProcessedAt {
    fn from(at: DateTime<Utc>) -> Self {
        ProcessedAt(at.to_rfc3339())
    }
}

impl TryFrom<String> for ProcessedAt {
    type Error = String;

    /// Accepts RFC 3339 and offset-free ISO-8601 date-times
    /// (`2024-05-01T10:20:30`, `2024-05-01T10:20:30.123456`).
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if let Err(e) = DateTime::parse_from_rfc3339(&value) {
            value
                .parse::<NaiveDateTime>()
                .map_err(|_| format!("invalid timestamp {:?}: {}", value, e))?;
        }
        Ok(ProcessedAt(value))
    }
}

impl From<ProcessedAt> for String {
    fn from(at: ProcessedAt) -> Self {
        at.0
    }
}

impl fmt::Display for ProcessedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: BTreeMap<String, ProcessedAt>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, video_key: &str) -> bool {
        self.entries.contains_key(video_key)
    }

    pub fn get(&self, video_key: &str) -> Option<&ProcessedAt> {
        self.entries.get(video_key)
    }

    /// Record `video_key` as fully processed, overwriting any earlier entry.
    pub fn mark_processed(&mut self, video_key: impl Into<String>, last_modified: DateTime<Utc>) {
        self.entries
            .insert(video_key.into(), ProcessedAt::from(last_modified));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Pretty JSON, two-space indent, keys in ascending order.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }
}
