use crate::domain::ledger::Ledger;
use crate::error::JobError;
use async_trait::async_trait;

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Load the ledger, or an empty one if none has been written yet
    async fn load(&self) -> Result<Ledger, JobError>;

    /// Overwrite the stored ledger
    async fn save(&self, ledger: &Ledger) -> Result<(), JobError>;
}
