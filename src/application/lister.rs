use std::collections::BTreeMap;

use crate::domain::ledger::Ledger;
use crate::domain::videos::{VideoFilter, VideoRecord};
use crate::error::StorageError;
use crate::ports::storage::StoragePort;

/// Videos under `prefix` that pass `filter` and are not yet in `ledger`,
/// sorted by key. Listing pages are followed until the store reports no
/// continuation token.
pub async fn list_new_videos(
    storage: &impl StoragePort,
    prefix: &str,
    filter: &VideoFilter,
    ledger: &Ledger,
) -> Result<Vec<VideoRecord>, StorageError> {
    let mut found: BTreeMap<String, VideoRecord> = BTreeMap::new();
    let mut token: Option<String> = None;

    loop {
        let page = storage.list_page(prefix, token.take()).await?;

        for obj in page.objects {
            if !filter.matches(&obj.key) || ledger.contains(&obj.key) {
                continue;
            }
            found.insert(
                obj.key.clone(),
                VideoRecord {
                    key: obj.key,
                    last_modified: obj.last_modified,
                },
            );
        }

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(found.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::local::FsAdapter;
    use crate::ports::storage::{ListPage, MockStoragePort, ObjectSummary};
    use chrono::{DateTime, TimeZone, Utc};
    use mockall::predicate::eq;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn object(key: &str, hour: u32) -> ObjectSummary {
        ObjectSummary {
            key: key.to_string(),
            last_modified: at(hour),
        }
    }

    /// Serve `objects` as pages of `page_size`, tokens being page indexes.
    fn paged_storage(objects: Vec<ObjectSummary>, page_size: usize) -> MockStoragePort {
        let pages: Vec<Vec<ObjectSummary>> =
            objects.chunks(page_size).map(|chunk| chunk.to_vec()).collect();
        let page_count = pages.len();

        let mut mock_storage = MockStoragePort::new();
        mock_storage
            .expect_list_page()
            .times(page_count.max(1))
            .returning(move |_, token| {
                let index: usize = token.map(|t| t.parse().unwrap()).unwrap_or(0);
                let objects = pages.get(index).cloned().unwrap_or_default();
                let next_token = if index + 1 < page_count {
                    Some((index + 1).to_string())
                } else {
                    None
                };
                Ok(ListPage {
                    objects,
                    next_token,
                })
            });
        mock_storage
    }

    fn keys(records: &[VideoRecord]) -> Vec<&str> {
        records.iter().map(|r| r.key.as_str()).collect()
    }

    #[tokio::test]
    async fn test_returns_set_difference_for_every_page_size() {
        let objects = vec![
            object("videos/e.mp4", 5),
            object("videos/b.mov", 2),
            object("videos/notes.txt", 3),
            object("videos/a.mp4", 1),
            object("videos/d.avi", 4),
            object("videos/", 0),
        ];
        let mut ledger = Ledger::new();
        ledger.mark_processed("videos/b.mov", at(2));
        ledger.mark_processed("videos/gone.mp4", at(9));

        for page_size in 1..=objects.len() {
            let storage = paged_storage(objects.clone(), page_size);
            let new_videos =
                list_new_videos(&storage, "videos/", &VideoFilter::default(), &ledger)
                    .await
                    .unwrap();

            assert_eq!(
                keys(&new_videos),
                vec!["videos/a.mp4", "videos/d.avi", "videos/e.mp4"],
                "page size {}",
                page_size
            );
        }
    }

    #[tokio::test]
    async fn test_records_carry_listing_timestamps() {
        let storage = paged_storage(vec![object("videos/a.mp4", 7)], 10);
        let new_videos = list_new_videos(&storage, "videos/", &VideoFilter::default(), &Ledger::new())
            .await
            .unwrap();

        assert_eq!(
            new_videos,
            vec![VideoRecord {
                key: "videos/a.mp4".to_string(),
                last_modified: at(7),
            }]
        );
    }

    #[tokio::test]
    async fn test_case_mode_decides_upper_case_extensions() {
        let objects = vec![
            object("videos/clip.mp4", 1),
            object("videos/clip.MOV", 1),
            object("videos/clip.txt", 1),
            object("videos/clip", 1),
        ];

        let storage = paged_storage(objects.clone(), 2);
        let insensitive = list_new_videos(&storage, "videos/", &VideoFilter::default(), &Ledger::new())
            .await
            .unwrap();
        assert_eq!(keys(&insensitive), vec!["videos/clip.MOV", "videos/clip.mp4"]);

        let storage = paged_storage(objects, 2);
        let sensitive_filter =
            VideoFilter::new(vec!["mp4".into(), "mov".into(), "avi".into()], true);
        let sensitive = list_new_videos(&storage, "videos/", &sensitive_filter, &Ledger::new())
            .await
            .unwrap();
        assert_eq!(keys(&sensitive), vec!["videos/clip.mp4"]);
    }

    #[tokio::test]
    async fn test_passes_prefix_and_stops_on_listing_error() {
        let mut mock_storage = MockStoragePort::new();
        mock_storage
            .expect_list_page()
            .with(eq("uploads/"), eq(None::<String>))
            .times(1)
            .returning(|_, _| {
                Ok(ListPage {
                    objects: vec![],
                    next_token: Some("page-2".to_string()),
                })
            });
        mock_storage
            .expect_list_page()
            .with(eq("uploads/"), eq(Some("page-2".to_string())))
            .times(1)
            .returning(|_, _| Err(StorageError::backend("throttled")));

        let result =
            list_new_videos(&mock_storage, "uploads/", &VideoFilter::default(), &Ledger::new()).await;
        assert!(matches!(result, Err(StorageError::Backend(_))));
    }

    #[tokio::test]
    async fn test_set_difference_against_local_store() {
        let store = tempdir().unwrap();
        let all = ["videos/a.mp4", "videos/b.mp4", "videos/c.mp4", "videos/d.mp4"];
        for key in all {
            let path = store.path().join(key);
            tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
            tokio::fs::write(path, key).await.unwrap();
        }
        let mut ledger = Ledger::new();
        ledger.mark_processed("videos/a.mp4", at(1));
        ledger.mark_processed("videos/c.mp4", at(1));

        let storage = FsAdapter::new(store.path()).with_page_size(1);
        let new_videos = list_new_videos(&storage, "videos/", &VideoFilter::default(), &ledger)
            .await
            .unwrap();

        let expected: BTreeSet<&str> = all
            .iter()
            .copied()
            .filter(|key| !ledger.contains(key))
            .collect();
        let actual: BTreeSet<&str> = new_videos.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(actual, expected);
    }
}
