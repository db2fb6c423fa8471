//! Verification ledger
//!
//! Append-only record of provider versions verifying contract contents.

use pactledger_core::{ContentId, Timestamp, VerificationId, VerificationResult, VersionId};
use rustc_hash::FxHashSet;

/// Table of verification results, in insertion order
#[derive(Debug, Default)]
pub struct VerificationTable {
    rows: Vec<VerificationResult>,
    next_id: u64,
}

impl VerificationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a verification result
    pub fn record(
        &mut self,
        content_id: ContentId,
        provider_version_id: VersionId,
        success: bool,
        now: Timestamp,
    ) -> VerificationResult {
        self.next_id += 1;
        let result = VerificationResult {
            id: VerificationId::new(self.next_id),
            content_id,
            provider_version_id,
            success,
            created_at: now,
        };
        self.rows.push(result.clone());
        result
    }

    /// Verifications of a content, oldest first
    pub fn for_content(&self, content_id: ContentId) -> Vec<&VerificationResult> {
        self.rows
            .iter()
            .filter(|v| v.content_id == content_id)
            .collect()
    }

    /// Earliest verification of a content
    pub fn first_for_content(&self, content_id: ContentId) -> Option<&VerificationResult> {
        self.rows.iter().find(|v| v.content_id == content_id)
    }

    /// Contents successfully verified by any of `provider_versions`
    pub fn successful_contents(&self, provider_versions: &FxHashSet<VersionId>) -> FxHashSet<ContentId> {
        self.rows
            .iter()
            .filter(|v| v.success && provider_versions.contains(&v.provider_version_id))
            .map(|v| v.content_id)
            .collect()
    }

    /// Drop every verification of `content_id`
    pub fn remove_for_content(&mut self, content_id: ContentId) -> usize {
        let before = self.rows.len();
        self.rows.retain(|v| v.content_id != content_id);
        before - self.rows.len()
    }

    /// Number of results
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
