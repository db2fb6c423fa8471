//! Latest / previous / next traversal and the finder queries
//!
//! "Latest" always means the latest revision of a consumer version. Among
//! consumer versions, recency is the version `order`, ties broken by
//! revision number.

use pactledger_core::{ConsumerVersionSelector, Pact, TagFilter, VerifiablePact};
use pactledger_storage::{display_order, Catalog, PublicationQuery};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use tracing::debug;

use super::ResolutionEngine;

/// Recency key: consumer version order, then revision
pub(super) fn recency(pact: &Pact) -> (u64, u32) {
    (pact.consumer_version.order, pact.revision_number)
}

/// Keep the most recent pact per key
pub(super) fn most_recent_by<K, F>(pacts: Vec<Pact>, key: F) -> Vec<Pact>
where
    K: Eq + Hash,
    F: Fn(&Pact) -> K,
{
    let mut best: FxHashMap<K, Pact> = FxHashMap::default();
    for pact in pacts {
        match best.entry(key(&pact)) {
            Entry::Occupied(mut slot) => {
                if recency(&pact) > recency(slot.get()) {
                    slot.insert(pact);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(pact);
            }
        }
    }
    best.into_values().collect()
}

/// Consumer name case-insensitively, then most recent version first
fn by_consumer_then_newest(a: &Pact, b: &Pact) -> std::cmp::Ordering {
    a.consumer
        .name
        .to_lowercase()
        .cmp(&b.consumer.name.to_lowercase())
        .then_with(|| recency(b).cmp(&recency(a)))
}

/// Latest pact per consumer of `provider` matching `tag`
pub(super) fn latest_per_consumer(catalog: &Catalog, provider: &str, tag: &TagFilter) -> Vec<Pact> {
    let query = PublicationQuery::latest_revisions()
        .provider(provider)
        .tag(tag.clone());
    let mut pacts = most_recent_by(catalog.find_pacts(&query), |p| p.consumer.id);
    pacts.sort_by(by_consumer_then_newest);
    pacts
}

/// Most recent pact of the same pair strictly before `pact`
fn previous_in(
    catalog: &Catalog,
    pact: &Pact,
    tag: &TagFilter,
    exclude_sha: Option<&str>,
) -> Option<Pact> {
    let mut query = PublicationQuery::latest_revisions()
        .consumer(pact.consumer_name())
        .provider(pact.provider_name())
        .tag(tag.clone())
        .before_order(pact.consumer_version_order());
    if let Some(sha) = exclude_sha {
        query = query.exclude_content_sha(sha);
    }
    catalog.find_pacts(&query).into_iter().max_by_key(recency)
}

impl ResolutionEngine {
    /// Latest pact of each consumer of `provider`
    ///
    /// Ordered by consumer name, case-insensitively.
    pub fn latest_for(&self, provider: &str, tag: &TagFilter) -> Vec<Pact> {
        let pacts = self
            .store
            .read(|c| latest_per_consumer(c, provider, tag));
        debug!(
            target: "pactledger::resolve",
            provider,
            tag = %tag,
            count = pacts.len(),
            "Resolved latest pacts"
        );
        pacts
    }

    /// The pact of the same pair immediately before `pact` in version order
    pub fn previous(&self, pact: &Pact, tag: &TagFilter) -> Option<Pact> {
        self.store.read(|c| previous_in(c, pact, tag, None))
    }

    /// The pact of the same pair immediately after `pact` in version order
    pub fn next(&self, pact: &Pact) -> Option<Pact> {
        let query = PublicationQuery::latest_revisions()
            .consumer(pact.consumer_name())
            .provider(pact.provider_name())
            .after_order(pact.consumer_version_order());
        self.store.read(|c| {
            c.find_pacts(&query)
                .into_iter()
                .min_by_key(|p| (p.consumer_version.order, std::cmp::Reverse(p.revision_number)))
        })
    }

    /// Nearest earlier pact whose content structurally differs
    ///
    /// Walks backwards one version at a time, skipping versions that carry
    /// the current step's content. Version order strictly decreases each
    /// step, so the walk ends.
    pub fn distinct_previous(&self, pact: &Pact) -> Option<Pact> {
        self.store.read(|c| {
            let mut current = pact.clone();
            let mut steps = 0usize;
            loop {
                let previous =
                    previous_in(c, &current, &TagFilter::Any, Some(current.content_sha.as_str()))?;
                steps += 1;
                if self.differ.differs(
                    &current.content,
                    &previous.content,
                    self.allow_unexpected_keys,
                ) {
                    debug!(
                        target: "pactledger::resolve",
                        pact = %pact,
                        found = %previous,
                        steps,
                        "Found distinct previous pact"
                    );
                    return Some(previous);
                }
                current = previous;
            }
        })
    }

    /// Previous pact for each consumer tag `pact` carries
    ///
    /// A pact without tags yields a single `Untagged` entry.
    pub fn previous_pacts(&self, pact: &Pact) -> Vec<(TagFilter, Option<Pact>)> {
        let filters: Vec<TagFilter> = if pact.consumer_version_tag_names.is_empty() {
            vec![TagFilter::Untagged]
        } else {
            pact.consumer_version_tag_names
                .iter()
                .map(TagFilter::named)
                .collect()
        };
        self.store.read(|c| {
            filters
                .into_iter()
                .map(|filter| {
                    let previous = previous_in(c, pact, &filter, None);
                    (filter, previous)
                })
                .collect()
        })
    }

    /// Latest pact of every (consumer, provider) pair
    ///
    /// Ordered by consumer name, then provider name.
    pub fn latest_pacts(&self) -> Vec<Pact> {
        self.search_latest(None, None, &TagFilter::Any)
    }

    /// Latest revision of every consumer version for `provider`
    ///
    /// Ordered by consumer name, then version order ascending.
    pub fn pacts_for_provider(&self, provider: &str, tag: &TagFilter) -> Vec<Pact> {
        let query = PublicationQuery::latest_revisions()
            .provider(provider)
            .tag(tag.clone());
        self.store.read(|c| c.find_pacts(&query))
    }

    /// Latest revision of one consumer version for every provider
    pub fn find_by_consumer_version(&self, consumer: &str, version_number: &str) -> Vec<Pact> {
        let query = PublicationQuery::latest_revisions()
            .consumer(consumer)
            .consumer_version_number(version_number);
        self.store.read(|c| c.find_pacts(&query))
    }

    /// Latest pact between `consumer` and `provider` matching `tag`
    pub fn find_latest_pact(&self, consumer: &str, provider: &str, tag: &TagFilter) -> Option<Pact> {
        self.search_latest_pact(Some(consumer), Some(provider), tag)
    }

    /// Most recent pact matching the optional consumer and provider
    pub fn search_latest_pact(
        &self,
        consumer: Option<&str>,
        provider: Option<&str>,
        tag: &TagFilter,
    ) -> Option<Pact> {
        self.search_latest(consumer, provider, tag)
            .into_iter()
            .max_by_key(recency)
    }

    /// Latest pact per pair matching the optional filters
    fn search_latest(&self, consumer: Option<&str>, provider: Option<&str>, tag: &TagFilter) -> Vec<Pact> {
        let mut query = PublicationQuery::latest_revisions().tag(tag.clone());
        if let Some(consumer) = consumer {
            query = query.consumer(consumer);
        }
        if let Some(provider) = provider {
            query = query.provider(provider);
        }
        let mut pacts = self.store.read(|c| {
            most_recent_by(c.find_pacts(&query), |p| (p.consumer.id, p.provider.id))
        });
        pacts.sort_by(display_order);
        pacts
    }

    /// One pact between `consumer` and `provider`
    ///
    /// With `sha`, the most recent consumer version that published that
    /// content; otherwise the latest revision, of `version_number` if given.
    pub fn find_pact(
        &self,
        consumer: &str,
        version_number: Option<&str>,
        provider: &str,
        sha: Option<&str>,
    ) -> Option<Pact> {
        let mut query = match sha {
            Some(sha) => PublicationQuery::all_revisions().content_sha(sha),
            None => PublicationQuery::latest_revisions(),
        }
        .consumer(consumer)
        .provider(provider);
        if let Some(number) = version_number {
            query = query.consumer_version_number(number);
        }
        self.store
            .read(|c| c.find_pacts(&query).into_iter().max_by_key(recency))
    }

    /// Every revision of one consumer version against `provider`
    pub fn find_all_revisions(&self, consumer: &str, version_number: &str, provider: &str) -> Vec<Pact> {
        let query = PublicationQuery::all_revisions()
            .consumer(consumer)
            .provider(provider)
            .consumer_version_number(version_number);
        self.store.read(|c| c.find_pacts(&query))
    }

    /// Latest revisions between `consumer` and `provider`, newest version first
    pub fn all_pact_versions_between(&self, consumer: &str, provider: &str, tag: &TagFilter) -> Vec<Pact> {
        let query = PublicationQuery::latest_revisions()
            .consumer(consumer)
            .provider(provider)
            .tag(tag.clone());
        let mut pacts = self.store.read(|c| c.find_pacts(&query));
        pacts.reverse();
        pacts
    }

    /// Pacts a provider should verify for `selectors`
    ///
    /// Without selectors, the latest pact of every consumer. Otherwise the
    /// latest pact per consumer for each tag of a `latest` selector; a pact
    /// that is latest for several tags is returned once with all of them.
    pub fn for_verification(
        &self,
        provider: &str,
        selectors: &[ConsumerVersionSelector],
    ) -> Vec<VerifiablePact> {
        let verifiable = self.store.read(|c| {
            let mut selected: Vec<(Pact, Vec<String>)> = Vec::new();
            if selectors.is_empty() {
                selected = latest_per_consumer(c, provider, &TagFilter::Any)
                    .into_iter()
                    .map(|pact| (pact, Vec::new()))
                    .collect();
            } else {
                let tags = selectors.iter().filter(|s| s.latest).filter_map(|s| s.tag.as_deref());
                for tag in tags {
                    for pact in latest_per_consumer(c, provider, &TagFilter::named(tag)) {
                        match selected.iter_mut().find(|(p, _)| p.id == pact.id) {
                            Some((_, head_tags)) => {
                                if !head_tags.iter().any(|t| t == tag) {
                                    head_tags.push(tag.to_string());
                                }
                            }
                            None => selected.push((pact, vec![tag.to_string()])),
                        }
                    }
                }
                selected.sort_by(|(a, _), (b, _)| by_consumer_then_newest(a, b));
            }
            selected
                .into_iter()
                .map(|(pact, head_tags)| {
                    let first = c.verifications().first_for_content(pact.content_id).cloned();
                    VerifiablePact::verified(pact, head_tags, first)
                })
                .collect::<Vec<_>>()
        });
        debug!(
            target: "pactledger::resolve",
            provider,
            selectors = selectors.len(),
            count = verifiable.len(),
            "Resolved pacts for verification"
        );
        verifiable
    }
}
