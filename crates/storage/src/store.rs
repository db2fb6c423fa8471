//! PactStore: the shared handle over all tables
//!
//! # Locking
//!
//! - `catalog`: one RwLock over every table. Each logical write (publication
//!   plus its latest pointer, a bulk delete plus its cascade) happens inside
//!   a single write critical section, so readers observe either the state
//!   before or after it, never a partial one.
//! - `revise_locks`: per-(consumer_version, provider) mutexes. Holding one
//!   makes "read the current revision, then append the next one" atomic for
//!   that pair without blocking writers of other pairs while content is
//!   hashed and looked up. A pair's mutex is dropped from the map as soon
//!   as no writer holds it, so the map only holds pairs being written.

use dashmap::DashMap;
use pactledger_core::{
    Clock, Component, ComponentId, ContentId, Error, PairKey, Result, SystemClock, Tag,
    VerificationResult, Version, VersionId,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::debug;

use crate::catalog::Catalog;

/// Shared, thread-safe pact store
pub struct PactStore {
    catalog: RwLock<Catalog>,
    revise_locks: DashMap<PairKey, Arc<Mutex<()>>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PactStore")
            .field("pair_locks", &self.revise_locks.len())
            .finish_non_exhaustive()
    }
}

impl Default for PactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PactStore {
    /// Create an empty store stamping rows with wall-clock time
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store with an explicit clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog: RwLock::new(Catalog::new()),
            revise_locks: DashMap::new(),
            clock,
        }
    }

    /// The store's clock
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Run `f` against a consistent view of every table
    pub fn read<R>(&self, f: impl FnOnce(&Catalog) -> R) -> R {
        let catalog = self.catalog.read();
        f(&catalog)
    }

    /// Run `f` inside the write critical section
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Catalog) -> R) -> R {
        let mut catalog = self.catalog.write();
        f(&mut catalog)
    }

    /// Mutex serializing revisions of one pair
    pub(crate) fn pair_lock(&self, pair: PairKey) -> Arc<Mutex<()>> {
        self.revise_locks
            .entry(pair)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop pair mutexes nobody is holding
    pub(crate) fn release_pair_locks(&self, pairs: &[PairKey]) {
        for pair in pairs {
            self.revise_locks
                .remove_if(pair, |_, lock| Arc::strong_count(lock) == 1);
        }
    }

    // ========== Version/Tag graph writes ==========

    /// Create a component, or return the existing one with that name
    pub fn create_component(&self, name: &str) -> Result<Component> {
        let now = self.clock.now();
        self.write(|c| c.graph.create_component(name, now))
    }

    /// Create (or find) a version of a named component, creating the
    /// component if needed
    pub fn create_version(&self, component: &str, number: &str) -> Result<Version> {
        let now = self.clock.now();
        self.write(|c| {
            let component = c.graph.create_component(component, now)?;
            c.graph.create_version(component.id, number, now)
        })
    }

    /// Attach a tag to a version
    pub fn add_tag(&self, version_id: VersionId, name: &str) -> Result<Tag> {
        let now = self.clock.now();
        let tag = self.write(|c| c.graph.add_tag(version_id, name, now))?;
        debug!(target: "pactledger::store", version = %version_id, tag = name, "Tag added");
        Ok(tag)
    }

    /// Component by name
    pub fn find_component(&self, name: &str) -> Option<Component> {
        self.read(|c| c.graph.component_by_name(name).cloned())
    }

    /// Version of a named component
    pub fn find_version(&self, component: &str, number: &str) -> Option<Version> {
        self.read(|c| {
            let component = c.graph.component_by_name(component)?;
            c.graph.version_by_number(component.id, number).cloned()
        })
    }

    /// Tag names of a version
    pub fn tag_names(&self, version_id: VersionId) -> Vec<String> {
        self.read(|c| c.graph.tag_names(version_id))
    }

    // ========== Verification ledger writes ==========

    /// Record a provider version's attempt to verify a content
    ///
    /// The provider version must belong to the content's provider.
    pub fn record_verification(
        &self,
        content_id: ContentId,
        provider_version_id: VersionId,
        success: bool,
    ) -> Result<VerificationResult> {
        let now = self.clock.now();
        self.write(|c| {
            let content = c
                .contents
                .get(content_id)
                .ok_or_else(|| Error::not_found("content", content_id.to_string()))?;
            let version = c
                .graph
                .version(provider_version_id)
                .ok_or_else(|| Error::not_found("version", provider_version_id.to_string()))?;
            if version.component_id != content.provider_id {
                return Err(Error::invalid_input(format!(
                    "version {} does not belong to the provider of content {}",
                    provider_version_id, content_id
                )));
            }
            Ok(c.verifications
                .record(content_id, provider_version_id, success, now))
        })
    }

    /// Verifications of a content, oldest first
    pub fn verifications_for(&self, content_id: ContentId) -> Vec<VerificationResult> {
        self.read(|c| {
            c.verifications
                .for_content(content_id)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Earliest verification of a content
    pub fn first_verification(&self, content_id: ContentId) -> Option<VerificationResult> {
        self.read(|c| c.verifications.first_for_content(content_id).cloned())
    }

    /// Look up a component id by name, failing with `NotFound`
    pub(crate) fn require_component(catalog: &Catalog, name: &str) -> Result<ComponentId> {
        catalog
            .graph
            .component_by_name(name)
            .map(|c| c.id)
            .ok_or_else(|| Error::not_found("component", name))
    }
}
