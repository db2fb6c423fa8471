//! The set of tables behind one store
//!
//! Readers receive `&Catalog` inside [`crate::PactStore::read`]; writers
//! mutate it under the store's write lock. Joins that span tables (pact
//! materialization, verified-by-tag aggregates) live here.

use pactledger_core::{
    ComponentId, ContentId, Pact, Publication, PublicationId, Timestamp, VersionId,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::content::ContentTable;
use crate::graph::VersionGraph;
use crate::latest::LatestPointerIndex;
use crate::publications::PublicationTable;
use crate::verifications::VerificationTable;

/// All tables of a pact store
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) graph: VersionGraph,
    pub(crate) contents: ContentTable,
    pub(crate) publications: PublicationTable,
    pub(crate) latest: LatestPointerIndex,
    pub(crate) verifications: VerificationTable,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Version/tag graph
    pub fn graph(&self) -> &VersionGraph {
        &self.graph
    }

    /// Content store
    pub fn contents(&self) -> &ContentTable {
        &self.contents
    }

    /// Publication ledger
    pub fn publications(&self) -> &PublicationTable {
        &self.publications
    }

    /// Latest-pointer index
    pub fn latest(&self) -> &LatestPointerIndex {
        &self.latest
    }

    /// Verification ledger
    pub fn verifications(&self) -> &VerificationTable {
        &self.verifications
    }

    /// Join a publication with its component, version, tag and content rows
    ///
    /// Returns `None` if any referenced row is missing.
    pub fn materialize(&self, publication: &Publication) -> Option<Pact> {
        let consumer = self.graph.component(publication.consumer_id)?;
        let provider = self.graph.component(publication.provider_id)?;
        let version = self.graph.version(publication.consumer_version_id)?;
        let content = self.contents.get(publication.content_id)?;
        Some(Pact {
            id: publication.id,
            consumer: consumer.clone(),
            provider: provider.clone(),
            consumer_version: version.clone(),
            consumer_version_tag_names: self.graph.tag_names(version.id),
            revision_number: publication.revision_number,
            content_id: content.id,
            content_sha: content.sha.clone(),
            content: content.body.clone(),
            created_at: publication.created_at,
        })
    }

    /// Materialized pact for a publication id
    pub fn pact(&self, id: PublicationId) -> Option<Pact> {
        self.publications
            .get(id)
            .and_then(|p| self.materialize(p))
    }

    /// Contents successfully verified by a version of `provider_id` tagged `tag`
    ///
    /// One aggregate per provider tag: verifications joined with provider
    /// version tags.
    pub fn successfully_verified_contents(
        &self,
        provider_id: ComponentId,
        tag: &str,
    ) -> FxHashSet<ContentId> {
        let provider_versions: FxHashSet<VersionId> = self
            .graph
            .versions_tagged(provider_id, tag)
            .into_iter()
            .collect();
        if provider_versions.is_empty() {
            return FxHashSet::default();
        }
        self.verifications.successful_contents(&provider_versions)
    }

    /// First use of each provider tag name
    pub fn provider_tags_first_used(
        &self,
        provider_id: ComponentId,
        tags: &[String],
    ) -> FxHashMap<String, Timestamp> {
        self.graph.tags_first_used(provider_id, tags)
    }
}
