//! Work-in-progress classification
//!
//! For a provider and a set of provider tags, finds head pacts the provider
//! has not yet verified under every tag.
//!
//! ## Algorithm
//!
//! ```text
//! 1. S[tag] = heads verified by a provider version tagged `tag`,
//!             plus heads created before `since`
//! 2. I      = intersection of S[tag] over all tags
//! 3. C      = heads not in I, created after `since`
//! 4. pending(p)      = tags whose S[tag] lacks p
//! 5. pre_existing(p) = pending tags first used before p was created
//! 6. emit p as WIP if pre_existing(p) is non-empty
//! ```
//!
//! Step 1 runs one aggregate per tag; steps 2 to 5 are set operations in
//! memory.

use pactledger_core::{ComponentId, PublicationId, Timestamp, VerifiablePact};
use pactledger_storage::Catalog;
use rustc_hash::FxHashSet;
use tracing::debug;

use super::heads::{head_pacts_in, HeadPact};
use super::ResolutionEngine;

/// Requested tags, without blanks or repeats, in request order
fn normalize_tags<S: AsRef<str>>(provider_tags: &[S]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(provider_tags.len());
    for tag in provider_tags {
        let tag = tag.as_ref();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Heads satisfied under `tag`: verified, or grandfathered
fn satisfied_under(
    catalog: &Catalog,
    provider_id: ComponentId,
    tag: &str,
    heads: &[HeadPact],
    since: Timestamp,
) -> FxHashSet<PublicationId> {
    let verified = catalog.successfully_verified_contents(provider_id, tag);
    heads
        .iter()
        .filter(|h| verified.contains(&h.pact.content_id) || h.pact.created_at < since)
        .map(|h| h.pact.id)
        .collect()
}

impl ResolutionEngine {
    /// WIP pacts of `provider` with respect to `provider_tags`
    ///
    /// Pacts created before `since` are never WIP. An empty tag set or an
    /// unknown provider yields no pacts. Results are ordered by consumer
    /// name, case-insensitively, then version order.
    pub fn wip_pacts<S: AsRef<str>>(
        &self,
        provider: &str,
        provider_tags: &[S],
        since: Timestamp,
    ) -> Vec<VerifiablePact> {
        let tags = normalize_tags(provider_tags);
        if tags.is_empty() {
            return Vec::new();
        }

        let wip = self.store.read(|c| {
            let Some(provider_id) = c.graph().component_by_name(provider).map(|p| p.id) else {
                return Vec::new();
            };
            let heads = head_pacts_in(c, provider);

            let satisfied: Vec<FxHashSet<PublicationId>> = tags
                .iter()
                .map(|tag| satisfied_under(c, provider_id, tag, &heads, since))
                .collect();

            let mut sets = satisfied.iter();
            let verified_by_all: FxHashSet<PublicationId> = match sets.next() {
                Some(first) => sets.fold(first.clone(), |all, set| {
                    all.intersection(set).copied().collect()
                }),
                None => FxHashSet::default(),
            };

            let mut candidates: Vec<&HeadPact> = heads
                .iter()
                .filter(|h| !verified_by_all.contains(&h.pact.id) && h.pact.created_at > since)
                .collect();
            if let Some(limit) = self.wip_candidate_limit {
                candidates.truncate(limit);
            }

            let first_used = c.provider_tags_first_used(provider_id, &tags);
            debug!(
                target: "pactledger::resolve",
                provider,
                heads = heads.len(),
                verified_by_all = verified_by_all.len(),
                candidates = candidates.len(),
                "WIP candidates selected"
            );

            candidates
                .into_iter()
                .filter_map(|head| {
                    let pre_existing: Vec<String> = tags
                        .iter()
                        .zip(&satisfied)
                        .filter(|(_, set)| !set.contains(&head.pact.id))
                        .map(|(tag, _)| tag)
                        .filter(|tag| {
                            first_used
                                .get(tag.as_str())
                                .map_or(false, |first| *first < head.pact.created_at)
                        })
                        .cloned()
                        .collect();
                    if pre_existing.is_empty() {
                        None
                    } else {
                        Some(VerifiablePact::wip(
                            head.pact.clone(),
                            pre_existing,
                            head.head_tag_names.clone(),
                        ))
                    }
                })
                .collect::<Vec<_>>()
        });

        debug!(
            target: "pactledger::resolve",
            provider,
            tags = ?tags,
            since = %since,
            count = wip.len(),
            "Resolved WIP pacts"
        );
        wip
    }
}
