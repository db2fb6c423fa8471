//! Publication ledger: create, revise and bulk delete
//!
//! ## Revision Sequence
//!
//! For a fixed (consumer_version, provider) pair the revision numbers are
//! exactly 1..=N, N being the number of content changes ever published for
//! the pair. Republishing content with the same identity is a no-op.
//!
//! ## Write Sequence
//!
//! ```text
//! 1. take the pair mutex
//! 2. read the current latest revision of the pair (read lock)
//! 3. same content identity? return it unchanged
//! 4. write lock: check the next slot is still free, else Conflict
//! 5. find-or-create content, append publication, refresh latest pointer
//! 6. drop the pair mutex; forget it if no other writer holds it
//! ```
//!
//! Step 5 runs in one write critical section, so the latest pointer is never
//! observed pointing at a missing or superseded revision.

use pactledger_core::{
    content_sha, ComponentId, Error, PairKey, Publication, PublicationId, Result,
    TriggeredRecordCleaner, VersionId,
};
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::store::PactStore;

impl PactStore {
    /// Publish content for a consumer version against a provider
    ///
    /// Creates revision 1, or revises the pair's latest publication if one
    /// already exists.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the version or provider does not exist
    /// - `Conflict` if a concurrent revise took the revision slot
    /// - `ContentCreation` if the content cannot be stored
    pub fn create(
        &self,
        consumer_version_id: VersionId,
        provider_id: ComponentId,
        sha: &str,
        body: JsonValue,
    ) -> Result<Publication> {
        let pair = PairKey {
            consumer_version_id,
            provider_id,
        };
        let result = {
            let lock = self.pair_lock(pair);
            let _guard = lock.lock();
            self.create_locked(pair, sha, body)
        };
        self.release_pair_locks(&[pair]);
        result
    }

    /// Create or revise with the pair mutex held
    fn create_locked(&self, pair: PairKey, sha: &str, body: JsonValue) -> Result<Publication> {
        let PairKey {
            consumer_version_id,
            provider_id,
        } = pair;
        let existing = self.read(|c| -> Result<Option<Publication>> {
            if c.graph.component(provider_id).is_none() {
                return Err(Error::not_found("component", provider_id.to_string()));
            }
            if c.graph.version(consumer_version_id).is_none() {
                return Err(Error::not_found("version", consumer_version_id.to_string()));
            }
            Ok(c.publications.latest_revision(&pair).cloned())
        })?;

        match existing {
            Some(existing) => self.revise_locked(&existing, sha, body),
            None => self.append_revision(pair, 1, sha, body),
        }
    }

    /// Compute the canonical sha of `body` and [`create`](Self::create)
    pub fn publish(
        &self,
        consumer_version_id: VersionId,
        provider_id: ComponentId,
        body: JsonValue,
    ) -> Result<Publication> {
        let sha = content_sha(&body)?;
        self.create(consumer_version_id, provider_id, &sha, body)
    }

    /// Revise an existing publication with new content
    ///
    /// Returns the existing publication unchanged when the content identity
    /// is the same; otherwise appends revision `existing + 1`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the publication does not exist
    /// - `Conflict` if revision `existing + 1` is already taken
    pub fn revise(&self, id: PublicationId, sha: &str, body: JsonValue) -> Result<Publication> {
        let pair = self
            .read(|c| c.publications.get(id).map(Publication::pair))
            .ok_or_else(|| Error::not_found("publication", id.to_string()))?;
        let result = {
            let lock = self.pair_lock(pair);
            let _guard = lock.lock();
            self.read(|c| c.publications.get(id).cloned())
                .ok_or_else(|| Error::not_found("publication", id.to_string()))
                .and_then(|existing| self.revise_locked(&existing, sha, body))
        };
        self.release_pair_locks(&[pair]);
        result
    }

    /// Revise with the pair mutex held
    fn revise_locked(&self, existing: &Publication, sha: &str, body: JsonValue) -> Result<Publication> {
        let unchanged = self.read(|c| {
            c.contents
                .find(existing.consumer_id, existing.provider_id, sha)
                .map_or(false, |content| content.id == existing.content_id)
        });
        if unchanged {
            debug!(
                target: "pactledger::ledger",
                publication = %existing.id,
                revision = existing.revision_number,
                "Republished identical content"
            );
            return Ok(existing.clone());
        }
        self.append_revision(existing.pair(), existing.revision_number + 1, sha, body)
    }

    /// Append `revision` to `pair` in one write critical section
    fn append_revision(
        &self,
        pair: PairKey,
        revision: u32,
        sha: &str,
        body: JsonValue,
    ) -> Result<Publication> {
        let now = self.clock().now();
        let publication = self.write(|c| -> Result<Publication> {
            let version = c
                .graph
                .version(pair.consumer_version_id)
                .cloned()
                .ok_or_else(|| Error::not_found("version", pair.consumer_version_id.to_string()))?;

            if c.publications.next_revision(&pair) != revision {
                let provider = c
                    .graph
                    .component(pair.provider_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| pair.provider_id.to_string());
                warn!(
                    target: "pactledger::ledger",
                    consumer_version = %version.number,
                    provider = %provider,
                    revision,
                    "Revision slot already taken"
                );
                return Err(Error::conflict(version.number, provider, revision));
            }

            let content_id = c.contents.find_or_create(
                version.component_id,
                pair.provider_id,
                sha,
                body,
                now,
            )?;
            let publication = c
                .publications
                .append(version.component_id, pair, content_id, revision, now)
                .ok_or_else(|| {
                    Error::InvalidOperation(format!("revision {} is not appendable", revision))
                })?;
            c.latest.upsert(&publication);
            Ok(publication)
        })?;

        info!(
            target: "pactledger::ledger",
            publication = %publication.id,
            consumer_version = %pair.consumer_version_id,
            provider = %pair.provider_id,
            revision = publication.revision_number,
            "Publication recorded"
        );
        Ok(publication)
    }

    /// Every revision of one consumer version against a provider, ascending
    pub fn revisions(&self, consumer_version_id: VersionId, provider_id: ComponentId) -> Vec<Publication> {
        let pair = PairKey {
            consumer_version_id,
            provider_id,
        };
        self.read(|c| c.publications.revisions(&pair).into_iter().cloned().collect())
    }

    // ========== Bulk delete ==========

    /// Delete every publication between `consumer` and `provider`
    ///
    /// With `tag`, only publications whose consumer version carries it.
    /// Returns the number of publications removed.
    pub fn delete_between(
        &self,
        consumer: &str,
        provider: &str,
        tag: Option<&str>,
        cleaner: &dyn TriggeredRecordCleaner,
    ) -> Result<usize> {
        let (consumer_id, provider_id) = self.read(|c| -> Result<_> {
            Ok((
                Self::require_component(c, consumer)?,
                Self::require_component(c, provider)?,
            ))
        })?;
        self.delete_pairs_where(cleaner, |c, pair| {
            pair.provider_id == provider_id
                && c.graph
                    .version(pair.consumer_version_id)
                    .map_or(false, |v| v.component_id == consumer_id)
                && tag.map_or(true, |t| c.graph.has_tag(pair.consumer_version_id, t))
        })
    }

    /// Delete every revision of one consumer version against `provider`
    pub fn delete_consumer_version(
        &self,
        consumer: &str,
        provider: &str,
        version_number: &str,
        cleaner: &dyn TriggeredRecordCleaner,
    ) -> Result<usize> {
        let (version_id, provider_id) = self.read(|c| -> Result<_> {
            let consumer_id = Self::require_component(c, consumer)?;
            let provider_id = Self::require_component(c, provider)?;
            let version = c
                .graph
                .version_by_number(consumer_id, version_number)
                .ok_or_else(|| Error::not_found("version", version_number))?;
            Ok((version.id, provider_id))
        })?;
        self.delete_pairs_where(cleaner, |_, pair| {
            pair.consumer_version_id == version_id && pair.provider_id == provider_id
        })
    }

    /// Delete every publication of a consumer version, any provider
    pub fn delete_by_version(
        &self,
        version_id: VersionId,
        cleaner: &dyn TriggeredRecordCleaner,
    ) -> Result<usize> {
        self.delete_pairs_where(cleaner, |_, pair| pair.consumer_version_id == version_id)
    }

    /// Delete whole revision sequences selected by `selector`
    ///
    /// The cleaner runs first, inside the write critical section; if it
    /// fails nothing is deleted.
    fn delete_pairs_where(
        &self,
        cleaner: &dyn TriggeredRecordCleaner,
        selector: impl Fn(&Catalog, &PairKey) -> bool,
    ) -> Result<usize> {
        let (pairs, removed) = self.write(|c| -> Result<(Vec<PairKey>, usize)> {
            let pairs: Vec<PairKey> = {
                let view: &Catalog = c;
                view.publications
                    .pairs()
                    .filter(|pair| selector(view, pair))
                    .copied()
                    .collect()
            };
            if pairs.is_empty() {
                return Ok((pairs, 0));
            }

            let mut ids: Vec<PublicationId> = pairs
                .iter()
                .flat_map(|pair| c.publications.revisions(pair))
                .map(|p| p.id)
                .collect();
            ids.sort();
            cleaner.delete_triggered_records(&ids)?;

            for pair in &pairs {
                c.publications.remove_pair(pair);
                c.latest.refresh_pair(pair, &c.publications);
            }
            Ok((pairs, ids.len()))
        })?;

        self.release_pair_locks(&pairs);
        if removed > 0 {
            info!(
                target: "pactledger::ledger",
                publications = removed,
                pairs = pairs.len(),
                "Publications deleted"
            );
        }
        Ok(removed)
    }
}
