//! AWS Stills Binary
//!
//! Single run against an S3 bucket, meant to be scheduled (cron, EventBridge,
//! Batch). It:
//! 1. Loads the processed-videos ledger from the bucket.
//! 2. Extracts stills from every new video under `VIDEO_PREFIX`.
//! 3. Uploads them under `STILLS_PREFIX` and writes the ledger back.
//!
//! Environment Variables:
//! - AWS_REGION: AWS region (e.g., us-east-1)
//! - S3_BUCKET: S3 bucket holding videos, stills and the ledger
//! - see `StillsConfig` for the optional job settings

use std::process::ExitCode;
use stillframe::{AwsConfig, ObjectLedger, RealStillsExecutor, S3Adapter, StillsJob};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    stillframe::init_tracing();

    let config = match AwsConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Load AWS config
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let s3_client = aws_sdk_s3::Client::new(&aws_config);

    let storage = S3Adapter::new(s3_client, config.s3_bucket.clone());
    let ledger = ObjectLedger::new(storage.clone(), config.stills.ledger_key.clone())
        .with_staging_dir(config.stills.work_dir.clone());
    let mut job = StillsJob::new(storage, ledger, RealStillsExecutor, config.stills);

    info!("Polling s3://{} for new videos...", config.s3_bucket);

    match job.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
