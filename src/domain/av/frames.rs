use std::path::Path;
use tracing::{error, info};

use super::cmd::StillsExecutor;
use crate::error::JobError;

/// File name pattern handed to ffmpeg; `%04d` becomes the frame number.
pub const FRAME_PATTERN: &str = "frame_%04d.jpg";
pub const FRAME_EXTENSION: &str = "jpg";

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSettings {
    /// Stills sampled per second of video
    pub frame_rate: f64,
    /// ffmpeg `-q:v` (1 is best, 31 worst)
    pub quality: u8,
    pub ffmpeg_bin: String,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            frame_rate: 1.0,
            quality: 2,
            ffmpeg_bin: String::from("ffmpeg"),
        }
    }
}

/// Sample stills from `video_path` into `output_dir` as
/// `frame_0001.jpg`, `frame_0002.jpg`, ...
pub async fn extract_stills(
    executor: &impl StillsExecutor,
    video_key: &str,
    video_path: &Path,
    output_dir: &Path,
    settings: &FrameSettings,
) -> Result<(), JobError> {
    tokio::fs::create_dir_all(output_dir).await?;
    let output_pattern = output_dir.join(FRAME_PATTERN);

    info!("Extracting stills to {:?}...", output_dir);
    let output = executor
        .run_ffmpeg_stills(
            &settings.ffmpeg_bin,
            video_path,
            &output_pattern,
            settings.frame_rate,
            settings.quality,
        )
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        error!("ffmpeg failed for {}: {}", video_key, output.status);
        error!("ffmpeg stderr: {}", stderr);
        return Err(JobError::Extraction {
            video: video_key.to_string(),
            status: output.status,
            stderr,
        });
    }
    Ok(())
}
