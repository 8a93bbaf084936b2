//! Stillframe - Video Stills Library
//!
//! Polls an object store for new videos, samples still frames from each one
//! with ffmpeg and uploads the stills next to them. A JSON ledger stored in the
//! same bucket remembers which videos are done so runs are idempotent.
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (ledger, video filter, still naming, ffmpeg)
//! - ports/: Trait definitions
//! - adapters/: Concrete implementations
//! - application/: Generic services
//! - config: Environment configuration
//!
//! # Features
//! - `aws` (default): S3 storage adapter and the `aws_stills` binary

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for convenience
pub use adapters::ledger::ObjectLedger;
pub use adapters::local::FsAdapter;
pub use application::{RunSummary, StillsJob};
pub use config::{LocalConfig, StillsConfig};
pub use domain::av::cmd::RealStillsExecutor;
pub use error::{JobError, StorageError};

#[cfg(feature = "aws")]
pub use adapters::aws::s3::S3Adapter;

#[cfg(feature = "aws")]
pub use config::AwsConfig;

/// Install the `tracing` subscriber used by the binaries.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
