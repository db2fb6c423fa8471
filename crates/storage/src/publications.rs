//! Publication table
//!
//! Rows are indexed by id and by (consumer_version, provider) pair. For each
//! pair the revision numbers form the contiguous sequence 1..=N: inserts
//! only ever append `max + 1`, and deletes always remove whole sequences.

use pactledger_core::{ComponentId, ContentId, PairKey, Publication, PublicationId, Timestamp};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Table of publications
#[derive(Debug, Default)]
pub struct PublicationTable {
    rows: BTreeMap<PublicationId, Publication>,
    /// revision -> id per pair
    by_pair: FxHashMap<PairKey, BTreeMap<u32, PublicationId>>,
    next_id: u64,
}

impl PublicationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Publication by id
    pub fn get(&self, id: PublicationId) -> Option<&Publication> {
        self.rows.get(&id)
    }

    /// All publications in id order
    pub fn iter(&self) -> impl Iterator<Item = &Publication> {
        self.rows.values()
    }

    /// Highest revision number recorded for `pair`
    pub fn max_revision(&self, pair: &PairKey) -> Option<u32> {
        self.by_pair
            .get(pair)
            .and_then(|revs| revs.keys().next_back().copied())
    }

    /// Publication at `revision` of `pair`
    pub fn at_revision(&self, pair: &PairKey, revision: u32) -> Option<&Publication> {
        self.by_pair
            .get(pair)
            .and_then(|revs| revs.get(&revision))
            .and_then(|id| self.rows.get(id))
    }

    /// Highest-revision publication of `pair`
    pub fn latest_revision(&self, pair: &PairKey) -> Option<&Publication> {
        let revision = self.max_revision(pair)?;
        self.at_revision(pair, revision)
    }

    /// Every revision of `pair`, ascending
    pub fn revisions(&self, pair: &PairKey) -> Vec<&Publication> {
        self.by_pair
            .get(pair)
            .map(|revs| revs.values().filter_map(|id| self.rows.get(id)).collect())
            .unwrap_or_default()
    }

    /// All pairs with at least one publication
    pub fn pairs(&self) -> impl Iterator<Item = &PairKey> {
        self.by_pair.keys()
    }

    /// Next revision number to hand out for `pair`
    pub fn next_revision(&self, pair: &PairKey) -> u32 {
        self.max_revision(pair).map_or(1, |max| max + 1)
    }

    /// Append a publication at the next revision of `pair`
    ///
    /// Returns `None` when `revision` is not the next free slot, leaving
    /// the table untouched.
    pub fn append(
        &mut self,
        consumer_id: ComponentId,
        pair: PairKey,
        content_id: ContentId,
        revision: u32,
        now: Timestamp,
    ) -> Option<Publication> {
        if revision != self.next_revision(&pair) {
            return None;
        }
        self.next_id += 1;
        let publication = Publication {
            id: PublicationId::new(self.next_id),
            consumer_id,
            consumer_version_id: pair.consumer_version_id,
            provider_id: pair.provider_id,
            content_id,
            revision_number: revision,
            created_at: now,
        };
        self.by_pair
            .entry(pair)
            .or_default()
            .insert(revision, publication.id);
        self.rows.insert(publication.id, publication.clone());
        Some(publication)
    }

    /// Remove every revision of `pair`
    pub fn remove_pair(&mut self, pair: &PairKey) -> Vec<Publication> {
        let Some(revs) = self.by_pair.remove(pair) else {
            return Vec::new();
        };
        revs.values().filter_map(|id| self.rows.remove(id)).collect()
    }

    /// Is `content_id` referenced by any publication
    pub fn references_content(&self, content_id: ContentId) -> bool {
        self.rows.values().any(|p| p.content_id == content_id)
    }

    /// Number of publications
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
