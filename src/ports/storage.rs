use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::error::StorageError;

/// One object reported by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

/// A single page of a prefix listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub objects: Vec<ObjectSummary>,
    /// Token for the next page, `None` once the listing is exhausted
    pub next_token: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Download an object to a local path.
    /// A missing object is reported as [`StorageError::NotFound`].
    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError>;

    /// Upload a file from a local path, overwriting any existing object
    async fn upload(&self, local_path: &Path, key: &str) -> Result<(), StorageError>;

    /// List one page of objects whose keys start with `prefix`
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, StorageError>;
}
