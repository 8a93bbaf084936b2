use crate::domain::ledger::Ledger;
use crate::error::{JobError, StorageError};
use crate::ports::repository::LedgerRepository;
use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::info;

/// ObjectLedger implements LedgerRepository as a JSON document stored at a
/// fixed key of the object store.
#[derive(Clone)]
pub struct ObjectLedger<S> {
    storage: S,
    key: String,
    staging_dir: Option<PathBuf>,
}

impl<S> ObjectLedger<S>
where
    S: StoragePort,
{
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            staging_dir: None,
        }
    }

    /// Stage the ledger file under `dir` instead of the system temp dir.
    pub fn with_staging_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.staging_dir = dir;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn staging_file(&self) -> Result<NamedTempFile, JobError> {
        match &self.staging_dir {
            Some(dir) => {
                tokio::fs::create_dir_all(dir).await?;
                Ok(NamedTempFile::new_in(dir)?)
            }
            None => Ok(NamedTempFile::new()?),
        }
    }
}

#[async_trait]
impl<S> LedgerRepository for ObjectLedger<S>
where
    S: StoragePort,
{
    async fn load(&self) -> Result<Ledger, JobError> {
        let temp_file = self.staging_file().await?;

        match self.storage.download(&self.key, temp_file.path()).await {
            Ok(()) => {}
            Err(StorageError::NotFound(_)) => {
                info!("No metadata file found, starting fresh.");
                return Ok(Ledger::new());
            }
            Err(e) => return Err(e.into()),
        }

        let bytes = tokio::fs::read(temp_file.path()).await?;
        let ledger = Ledger::from_json(&bytes)?;
        info!("Loaded {} processed video(s) from {}", ledger.len(), self.key);
        Ok(ledger)
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), JobError> {
        let temp_file = self.staging_file().await?;
        tokio::fs::write(temp_file.path(), ledger.to_json()?).await?;

        self.storage.upload(temp_file.path(), &self.key).await?;
        info!("Updated processed videos metadata in {}", self.key);
        Ok(())
    }
}
