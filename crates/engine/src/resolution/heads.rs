//! Head pacts
//!
//! The head set is the union of two sets:
//!
//! - the latest pact of each consumer, tagged or not
//! - the latest pact of each (consumer, consumer tag)
//!
//! It is a superset of either one alone. An untagged newest version is a
//! head with no head tags; an older version that is still the newest for
//! some tag is a head for that tag. A pact in both sets appears once, with
//! every tag it heads.

use pactledger_core::{ComponentId, Pact, PublicationId};
use pactledger_storage::{display_order, Catalog, PublicationQuery};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::hash_map::Entry;

use super::latest::{most_recent_by, recency};
use super::ResolutionEngine;

/// The latest pact of a consumer, overall or for some of its tags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadPact {
    /// The pact
    pub pact: Pact,
    /// Consumer tags this pact is the latest for, sorted
    pub head_tag_names: Vec<String>,
}

/// Head pacts of every consumer of `provider`, in display order
pub(super) fn head_pacts_in(catalog: &Catalog, provider: &str) -> Vec<HeadPact> {
    let pacts = catalog.find_pacts(&PublicationQuery::latest_revisions().provider(provider));

    let mut latest_by_tag: FxHashMap<(ComponentId, String), Pact> = FxHashMap::default();
    for pact in &pacts {
        for tag in &pact.consumer_version_tag_names {
            match latest_by_tag.entry((pact.consumer.id, tag.clone())) {
                Entry::Occupied(mut slot) => {
                    if recency(pact) > recency(slot.get()) {
                        slot.insert(pact.clone());
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(pact.clone());
                }
            }
        }
    }

    let mut heads: FxHashMap<PublicationId, HeadPact> = FxHashMap::default();
    for pact in most_recent_by(pacts, |p| p.consumer.id) {
        heads.insert(
            pact.id,
            HeadPact {
                pact,
                head_tag_names: Vec::new(),
            },
        );
    }
    for ((_, tag), pact) in latest_by_tag {
        heads
            .entry(pact.id)
            .or_insert_with(|| HeadPact {
                pact,
                head_tag_names: Vec::new(),
            })
            .head_tag_names
            .push(tag);
    }

    let mut heads: Vec<HeadPact> = heads.into_values().collect();
    for head in &mut heads {
        head.head_tag_names.sort();
    }
    heads.sort_by(|a, b| display_order(&a.pact, &b.pact));
    heads
}

impl ResolutionEngine {
    /// Head pacts for `provider`
    ///
    /// Ordered by consumer name, case-insensitively, then version order.
    pub fn head_pacts(&self, provider: &str) -> Vec<HeadPact> {
        self.store.read(|c| head_pacts_in(c, provider))
    }
}
