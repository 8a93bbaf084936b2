use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::av::frames::FRAME_EXTENSION;
use crate::domain::stills::still_key;
use crate::error::JobError;
use crate::ports::storage::StoragePort;

/// Upload every still in `output_dir` under the folder named after
/// `video_key`. Returns the number of stills uploaded.
pub async fn upload_stills(
    storage: &impl StoragePort,
    output_dir: &Path,
    video_key: &str,
    stills_prefix: &str,
) -> Result<usize, JobError> {
    let stills = list_stills(output_dir).await?;

    for (file_name, local_path) in &stills {
        let key = still_key(stills_prefix, video_key, file_name);
        info!("Uploading {} to {}...", file_name, key);
        storage.upload(local_path, &key).await?;
    }
    Ok(stills.len())
}

/// Still images in `dir` as (file name, path), sorted by name.
async fn list_stills(dir: &Path) -> Result<Vec<(String, PathBuf)>, JobError> {
    let mut stills = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };
        let is_still = Path::new(&file_name)
            .extension()
            .is_some_and(|ext| ext == FRAME_EXTENSION);
        if is_still {
            stills.push((file_name, entry.path()));
        }
    }
    stills.sort();
    Ok(stills)
}
