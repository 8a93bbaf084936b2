use std::fmt;
use tempfile::TempDir;
use tracing::{debug, error, info};

use crate::application::lister::list_new_videos;
use crate::application::uploader::upload_stills;
use crate::config::StillsConfig;
use crate::domain::av::cmd::StillsExecutor;
use crate::domain::av::frames::extract_stills;
use crate::domain::ledger::Ledger;
use crate::domain::videos::VideoRecord;
use crate::error::JobError;
use crate::ports::repository::LedgerRepository;
use crate::ports::storage::StoragePort;

const LOCAL_VIDEO_NAME: &str = "video_temp";
const LOCAL_STILLS_DIR: &str = "stills";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    LedgerLoaded,
    Listing,
    Downloading,
    Extracting,
    Uploading,
    MarkedProcessed,
    LedgerSaved,
    Done,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub videos_processed: usize,
    pub stills_uploaded: usize,
}

/// One polling run: find new videos, turn each into stills, record them.
pub struct StillsJob<S, L, X> {
    storage: S,
    ledger: L,
    executor: X,
    config: StillsConfig,
    state: JobState,
}

impl<S, L, X> StillsJob<S, L, X>
where
    S: StoragePort,
    L: LedgerRepository,
    X: StillsExecutor,
{
    pub fn new(storage: S, ledger: L, executor: X, config: StillsConfig) -> Self {
        Self {
            storage,
            ledger,
            executor,
            config,
            state: JobState::Idle,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub async fn run(&mut self) -> Result<RunSummary, JobError> {
        match self.run_batch().await {
            Ok(summary) => {
                self.transition(JobState::Done);
                Ok(summary)
            }
            Err(e) => {
                error!("Run failed in state {}: {}", self.state, e);
                self.transition(JobState::Failed);
                Err(e)
            }
        }
    }

    async fn run_batch(&mut self) -> Result<RunSummary, JobError> {
        let mut ledger = self.ledger.load().await?;
        self.transition(JobState::LedgerLoaded);

        self.transition(JobState::Listing);
        let new_videos = list_new_videos(
            &self.storage,
            &self.config.video_prefix,
            &self.config.filter,
            &ledger,
        )
        .await?;

        if new_videos.is_empty() {
            info!("No new videos found to process.");
            return Ok(RunSummary::default());
        }
        info!("Found {} new video(s) to process.", new_videos.len());

        // Dropping the guard removes the directory on every exit path.
        let work_dir = match &self.config.work_dir {
            Some(parent) => {
                tokio::fs::create_dir_all(parent).await?;
                TempDir::new_in(parent)?
            }
            None => TempDir::new()?,
        };

        let mut summary = RunSummary::default();
        for video in &new_videos {
            summary.stills_uploaded += self.process_video(video, &work_dir, &mut ledger).await?;
            summary.videos_processed += 1;
        }

        self.ledger.save(&ledger).await?;
        self.transition(JobState::LedgerSaved);

        info!(
            "Processing complete! {} video(s), {} still(s) uploaded.",
            summary.videos_processed, summary.stills_uploaded
        );
        Ok(summary)
    }

    async fn process_video(
        &mut self,
        video: &VideoRecord,
        work_dir: &TempDir,
        ledger: &mut Ledger,
    ) -> Result<usize, JobError> {
        let video_path = work_dir.path().join(LOCAL_VIDEO_NAME);
        let stills_dir = work_dir.path().join(LOCAL_STILLS_DIR);
        if tokio::fs::try_exists(&stills_dir).await? {
            tokio::fs::remove_dir_all(&stills_dir).await?;
        }

        self.transition(JobState::Downloading);
        info!("Downloading {}...", video.key);
        self.storage.download(&video.key, &video_path).await?;

        self.transition(JobState::Extracting);
        extract_stills(
            &self.executor,
            &video.key,
            &video_path,
            &stills_dir,
            &self.config.frames,
        )
        .await?;

        self.transition(JobState::Uploading);
        let uploaded = upload_stills(
            &self.storage,
            &stills_dir,
            &video.key,
            &self.config.stills_prefix,
        )
        .await?;

        ledger.mark_processed(video.key.clone(), video.last_modified);
        self.transition(JobState::MarkedProcessed);
        info!("Processed {} ({} still(s))", video.key, uploaded);
        Ok(uploaded)
    }

    fn transition(&mut self, next: JobState) {
        debug!("{} -> {}", self.state, next);
        self.state = next;
    }
}
