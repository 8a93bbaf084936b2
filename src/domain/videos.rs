use chrono::{DateTime, Utc};
use std::path::Path;

use crate::config::DEFAULT_VIDEO_EXTENSIONS;

/// A source video discovered by listing, not yet in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

/// Extension allow-list used to pick video objects out of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFilter {
    extensions: Vec<String>,
    case_sensitive: bool,
}

impl Default for VideoFilter {
    fn default() -> Self {
        Self::new(
            DEFAULT_VIDEO_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            false,
        )
    }
}

impl VideoFilter {
    pub fn new(extensions: Vec<String>, case_sensitive: bool) -> Self {
        Self {
            extensions,
            case_sensitive,
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// True when the key's file name ends in an allowed extension.
    /// Directory markers (`videos/`) never match. Neither do dot-files such as
    /// `videos/.mp4`: the name has no stem, so `.mp4` is not an extension and
    /// there would be no still folder to name after it.
    pub fn matches(&self, key: &str) -> bool {
        if key.ends_with('/') {
            return false;
        }
        let Some(ext) = Path::new(key).extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|allowed| {
            if self.case_sensitive {
                allowed == ext
            } else {
                allowed.eq_ignore_ascii_case(ext)
            }
        })
    }
}
