//! Error types shared by the ports, adapters and the job driver.

use std::error::Error;
use std::fmt;
use std::io;
use std::process::ExitStatus;

use crate::config::ConfigError;

pub type BoxError = Box<dyn Error + Send + Sync>;

/// Failures reported by a [`StoragePort`](crate::ports::storage::StoragePort).
#[derive(Debug)]
pub enum StorageError {
    /// The requested object does not exist.
    NotFound(String),
    /// The key cannot be mapped onto the backing store.
    InvalidKey(String),
    Io(io::Error),
    Backend(BoxError),
}

impl StorageError {
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        StorageError::Backend(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(key) => write!(f, "Object not found: {}", key),
            StorageError::InvalidKey(key) => write!(f, "Invalid object key: {}", key),
            StorageError::Io(e) => write!(f, "Storage I/O error: {}", e),
            StorageError::Backend(e) => write!(f, "Storage backend error: {}", e),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Backend(e) => Some(e.as_ref()),
            StorageError::NotFound(_) | StorageError::InvalidKey(_) => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

/// Everything that can abort a run.
#[derive(Debug)]
pub enum JobError {
    Config(ConfigError),
    Storage(StorageError),
    MalformedLedger(serde_json::Error),
    /// ffmpeg exited with a nonzero status.
    Extraction {
        video: String,
        status: ExitStatus,
        stderr: String,
    },
    Io(io::Error),
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::Config(e) => write!(f, "Configuration error: {}", e),
            JobError::Storage(e) => write!(f, "{}", e),
            JobError::MalformedLedger(e) => write!(f, "Malformed ledger document: {}", e),
            JobError::Extraction { video, status, .. } => {
                write!(f, "Frame extraction failed for {}: {}", video, status)
            }
            JobError::Io(e) => write!(f, "Local I/O error: {}", e),
        }
    }
}

impl Error for JobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            JobError::Config(e) => Some(e),
            JobError::Storage(e) => Some(e),
            JobError::MalformedLedger(e) => Some(e),
            JobError::Io(e) => Some(e),
            JobError::Extraction { .. } => None,
        }
    }
}

impl From<ConfigError> for JobError {
    fn from(err: ConfigError) -> Self {
        JobError::Config(err)
    }
}

impl From<StorageError> for JobError {
    fn from(err: StorageError) -> Self {
        JobError::Storage(err)
    }
}

impl From<io::Error> for JobError {
    fn from(err: io::Error) -> Self {
        JobError::Io(err)
    }
}

impl From<serde_json::Error> for JobError {
    fn from(err: serde_json::Error) -> Self {
        JobError::MalformedLedger(err)
    }
}
