//! Latest-pointer index
//!
//! One row per (consumer_version, provider) pair, pointing at the
//! publication with the highest revision for that pair. This is a cache over
//! the publication table, never a source of truth:
//!
//! - every publication append refreshes the pair's row in the same write
//! - every delete refreshes the affected pairs
//! - [`LatestPointerIndex::rebuild`] recomputes all rows from publications

use pactledger_core::{ComponentId, ContentId, PairKey, Publication, PublicationId};
use rustc_hash::FxHashMap;

use crate::publications::PublicationTable;

/// Materialized latest publication of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestPointer {
    /// Consumer component of the pair
    pub consumer_id: ComponentId,
    /// Pointed-to publication
    pub publication_id: PublicationId,
    /// Content bound by that publication
    pub content_id: ContentId,
    /// Its revision number
    pub revision_number: u32,
}

impl From<&Publication> for LatestPointer {
    fn from(p: &Publication) -> Self {
        Self {
            consumer_id: p.consumer_id,
            publication_id: p.id,
            content_id: p.content_id,
            revision_number: p.revision_number,
        }
    }
}

/// Index: PairKey → latest publication
#[derive(Debug, Default)]
pub struct LatestPointerIndex {
    index: FxHashMap<PairKey, LatestPointer>,
}

impl LatestPointerIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the publication's pair at it unless a higher revision is indexed
    pub fn upsert(&mut self, publication: &Publication) {
        let pointer = LatestPointer::from(publication);
        self.index
            .entry(publication.pair())
            .and_modify(|existing| {
                if pointer.revision_number >= existing.revision_number {
                    *existing = pointer;
                }
            })
            .or_insert(pointer);
    }

    /// Latest pointer of a pair
    pub fn get(&self, pair: &PairKey) -> Option<&LatestPointer> {
        self.index.get(pair)
    }

    /// All pointers
    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &LatestPointer)> {
        self.index.iter()
    }

    /// Recompute one pair from the publication table
    ///
    /// Returns true if the row changed.
    pub fn refresh_pair(&mut self, pair: &PairKey, publications: &PublicationTable) -> bool {
        let expected = publications.latest_revision(pair).map(LatestPointer::from);
        let current = self.index.get(pair).copied();
        if expected == current {
            return false;
        }
        match expected {
            Some(pointer) => {
                self.index.insert(*pair, pointer);
            }
            None => {
                self.index.remove(pair);
            }
        }
        true
    }

    /// Pairs whose row disagrees with the publication table
    pub fn mismatches(&self, publications: &PublicationTable) -> Vec<PairKey> {
        let mut pairs: Vec<PairKey> = publications
            .pairs()
            .chain(self.index.keys())
            .copied()
            .collect();
        pairs.sort();
        pairs.dedup();
        pairs
            .into_iter()
            .filter(|pair| {
                publications.latest_revision(pair).map(LatestPointer::from)
                    != self.index.get(pair).copied()
            })
            .collect()
    }

    /// Recompute every row from the publication table
    ///
    /// Returns the number of rows that changed.
    pub fn rebuild(&mut self, publications: &PublicationTable) -> usize {
        let stale = self.mismatches(publications);
        for pair in &stale {
            self.refresh_pair(pair, publications);
        }
        stale.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of pairs in the index
    pub fn len(&self) -> usize {
        self.index.len()
    }
}
