use crate::error::StorageError;
use crate::ports::storage::{ListPage, ObjectSummary, StoragePort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Component, Path, PathBuf};

const DEFAULT_PAGE_SIZE: usize = 1000;

/// FsAdapter implements StoragePort on top of a local directory.
/// Object keys are `/`-separated paths relative to `root`.
#[derive(Clone, Debug)]
pub struct FsAdapter {
    root: PathBuf,
    page_size: usize,
}

impl FsAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Limit how many objects a single listing page returns.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !key_is_valid(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    /// Every file under the root as (key, last modified), sorted by key.
    async fn all_objects(&self) -> Result<Vec<ObjectSummary>, StorageError> {
        let mut objects = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound && dir == self.root => break,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    let Some(key) = self.key_for(&entry.path()) else {
                        continue;
                    };
                    let modified = entry.metadata().await?.modified()?;
                    objects.push(ObjectSummary {
                        key,
                        last_modified: DateTime::<Utc>::from(modified),
                    });
                }
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Option<Vec<&str>> = relative
            .components()
            .map(|component| match component {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();
        Some(parts?.join("/"))
    }
}

fn key_is_valid(key: &str) -> bool {
    if key.is_empty() || key.ends_with('/') {
        return false;
    }
    Path::new(key)
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
}

#[async_trait]
impl StoragePort for FsAdapter {
    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError> {
        let object_path = self.object_path(key)?;
        match tokio::fs::copy(&object_path, local_path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !object_path.exists() => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn upload(&self, local_path: &Path, key: &str) -> Result<(), StorageError> {
        let object_path = self.object_path(key)?;
        if let Some(parent) = object_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(local_path, &object_path).await?;
        Ok(())
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, StorageError> {
        let mut remaining = self
            .all_objects()
            .await?
            .into_iter()
            .filter(|obj| obj.key.starts_with(prefix))
            .filter(|obj| match &continuation {
                Some(after) => obj.key.as_str() > after.as_str(),
                None => true,
            });

        let objects: Vec<ObjectSummary> = remaining.by_ref().take(self.page_size).collect();
        let next_token = if remaining.next().is_some() {
            objects.last().map(|obj| obj.key.clone())
        } else {
            None
        };

        Ok(ListPage {
            objects,
            next_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn put(root: &Path, key: &str, contents: &str) {
        let path = root.join(key);
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(path, contents).await.unwrap();
    }

    #[tokio::test]
    async fn test_download_missing_object_is_not_found() {
        let store = tempdir().unwrap();
        let local = tempdir().unwrap();
        let adapter = FsAdapter::new(store.path());

        let result = adapter
            .download("processed_videos.json", &local.path().join("ledger.json"))
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(key)) if key == "processed_videos.json"));
    }

    #[tokio::test]
    async fn test_upload_then_download() {
        let store = tempdir().unwrap();
        let local = tempdir().unwrap();
        let adapter = FsAdapter::new(store.path());

        let source = local.path().join("frame_0001.jpg");
        tokio::fs::write(&source, b"jpeg").await.unwrap();
        adapter.upload(&source, "stills/trip1/frame_0001.jpg").await.unwrap();
        assert!(store.path().join("stills/trip1/frame_0001.jpg").is_file());

        let target = local.path().join("copy.jpg");
        adapter.download("stills/trip1/frame_0001.jpg", &target).await.unwrap();
        assert_eq!(tokio::fs::read(&target).await.unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn test_rejects_keys_escaping_root() {
        let store = tempdir().unwrap();
        let adapter = FsAdapter::new(store.path());
        let local = store.path().join("x");

        for key in ["../outside.mp4", "/etc/passwd", "", "videos/"] {
            let result = adapter.download(key, &local).await;
            assert!(
                matches!(result, Err(StorageError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[tokio::test]
    async fn test_list_pages_follow_tokens() {
        let store = tempdir().unwrap();
        put(store.path(), "videos/c.mp4", "c").await;
        put(store.path(), "videos/a.mp4", "a").await;
        put(store.path(), "videos/nested/b.mov", "b").await;
        put(store.path(), "other/d.mp4", "d").await;
        let adapter = FsAdapter::new(store.path()).with_page_size(2);

        let first = adapter.list_page("videos/", None).await.unwrap();
        let keys: Vec<_> = first.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["videos/a.mp4", "videos/c.mp4"]);
        assert_eq!(first.next_token.as_deref(), Some("videos/c.mp4"));

        let second = adapter
            .list_page("videos/", first.next_token.clone())
            .await
            .unwrap();
        let keys: Vec<_> = second.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["videos/nested/b.mov"]);
        assert!(second.next_token.is_none());
    }

    #[tokio::test]
    async fn test_list_missing_root_is_empty() {
        let store = tempdir().unwrap();
        let adapter = FsAdapter::new(store.path().join("absent"));

        let page = adapter.list_page("", None).await.unwrap();
        assert!(page.objects.is_empty());
        assert!(page.next_token.is_none());
    }
}
