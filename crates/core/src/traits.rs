//! Hooks into collaborators outside the ledger
//!
//! Bulk publication deletes must first remove records that other subsystems
//! keep about those publications (webhook executions triggered by them).
//! The ledger only knows this hook, never the subsystem behind it.

use crate::error::Result;
use crate::types::PublicationId;

/// Cascade hook invoked before publications are deleted
///
/// Thread safety: implementations are shared across threads (Send + Sync).
pub trait TriggeredRecordCleaner: Send + Sync {
    /// Remove every record referencing one of `publication_ids`
    ///
    /// # Errors
    ///
    /// Returning an error aborts the delete; no publication is removed.
    fn delete_triggered_records(&self, publication_ids: &[PublicationId]) -> Result<()>;
}

/// Cleaner for deployments without triggered records
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTriggeredRecords;

impl TriggeredRecordCleaner for NoTriggeredRecords {
    fn delete_triggered_records(&self, _publication_ids: &[PublicationId]) -> Result<()> {
        Ok(())
    }
}
