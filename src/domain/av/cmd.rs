use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::process::Output;
use tokio::process::Command as TokioCommand;

/// Runs the external tool that samples stills out of a video.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StillsExecutor: Send + Sync {
    async fn run_ffmpeg_stills(
        &self,
        ffmpeg_bin: &str,
        video_path: &Path,
        output_pattern: &Path,
        frame_rate: f64,
        quality: u8,
    ) -> io::Result<Output>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RealStillsExecutor;

#[async_trait]
impl StillsExecutor for RealStillsExecutor {
    async fn run_ffmpeg_stills(
        &self,
        ffmpeg_bin: &str,
        video_path: &Path,
        output_pattern: &Path,
        frame_rate: f64,
        quality: u8,
    ) -> io::Result<Output> {
        TokioCommand::new(ffmpeg_bin)
            .arg("-y")
            .arg("-i")
            .arg(video_path)
            .arg("-vf")
            .arg(format!("fps={}", frame_rate))
            .arg("-q:v")
            .arg(quality.to_string())
            .arg(output_pattern)
            .output()
            .await
    }
}
