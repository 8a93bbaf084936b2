//! Local Stills Binary - a directory stands in for the bucket
//!
//! Same run as `aws_stills`, with `STORE_ROOT` as the store. Handy for trying
//! ffmpeg settings without touching S3.

use std::process::ExitCode;
use stillframe::{FsAdapter, LocalConfig, ObjectLedger, RealStillsExecutor, StillsJob};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    stillframe::init_tracing();

    let config = match LocalConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let storage = FsAdapter::new(&config.store_root);
    let ledger = ObjectLedger::new(storage.clone(), config.stills.ledger_key.clone())
        .with_staging_dir(config.stills.work_dir.clone());
    let mut job = StillsJob::new(storage, ledger, RealStillsExecutor, config.stills);

    info!("Polling {:?} for new videos...", config.store_root);

    match job.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
