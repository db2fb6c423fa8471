//! Consistency repair and content cleanup
//!
//! The publication table is the source of truth for latest pointers. After a
//! crash or a suspected bug the pointers can be recomputed from it.

use pactledger_core::{ContentId, PairKey, Result};
use tracing::{info, warn};

use crate::store::PactStore;

impl PactStore {
    /// Pairs whose latest pointer disagrees with the publication table
    pub fn latest_pointer_mismatches(&self) -> Vec<PairKey> {
        self.read(|c| c.latest.mismatches(&c.publications))
    }

    /// Recompute every latest pointer from publications
    ///
    /// Returns the number of pointers that changed.
    pub fn repair_latest_pointers(&self) -> usize {
        let repaired = self.write(|c| c.latest.rebuild(&c.publications));
        if repaired > 0 {
            warn!(target: "pactledger::store", repaired, "Latest pointers were inconsistent and have been rebuilt");
        } else {
            info!(target: "pactledger::store", "Latest pointers consistent");
        }
        repaired
    }

    /// Delete contents between `consumer` and `provider` no publication uses
    ///
    /// Verification results of the deleted contents go with them. Returns
    /// the number of contents removed.
    pub fn delete_unreferenced_contents_between(&self, consumer: &str, provider: &str) -> Result<usize> {
        let removed = self.write(|c| -> Result<Vec<ContentId>> {
            let consumer_id = Self::require_component(c, consumer)?;
            let provider_id = Self::require_component(c, provider)?;
            let unreferenced: Vec<ContentId> = c
                .contents
                .ids_between(consumer_id, provider_id)
                .into_iter()
                .filter(|id| !c.publications.references_content(*id))
                .collect();
            for id in &unreferenced {
                c.verifications.remove_for_content(*id);
                c.contents.remove(*id);
            }
            Ok(unreferenced)
        })?;
        if !removed.is_empty() {
            info!(
                target: "pactledger::store",
                consumer,
                provider,
                contents = removed.len(),
                "Unreferenced contents deleted"
            );
        }
        Ok(removed.len())
    }

    /// Drop a pair's latest pointer without touching its publications
    #[cfg(test)]
    pub(crate) fn corrupt_latest_pointer(&self, pair: &PairKey) {
        let empty = crate::publications::PublicationTable::new();
        self.write(|c| c.latest.refresh_pair(pair, &empty));
    }
}
