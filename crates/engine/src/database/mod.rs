//! PactDatabase: the ledger handle
//!
//! Bundles a [`PactStore`], its configuration, the resolution engine and the
//! external collaborators (content differ, webhook cleanup hook). All writes
//! go through the store; all reads go through [`PactDatabase::resolver`].
//!
//! ## Opening
//!
//! ```text
//! // In-memory, defaults
//! let db = PactDatabase::new();
//!
//! // Config from <dir>/pactledger.toml, created on first open
//! let db = PactDatabase::open_in("/var/lib/pactledger")?;
//!
//! // Explicit collaborators
//! let db = PactDatabase::builder()
//!     .store(existing)
//!     .cleaner(Arc::new(MyWebhookStore))
//!     .build();
//! ```

pub mod builder;
pub mod config;

pub use builder::PactDatabaseBuilder;
pub use config::{LedgerConfig, CONFIG_FILE_NAME};

use pactledger_core::{
    Component, ComponentId, ContentId, PairKey, Publication, PublicationId, Result, Tag,
    TriggeredRecordCleaner, VerificationResult, Version, VersionId,
};
use pactledger_storage::PactStore;
use serde_json::Value as JsonValue;
use std::path::Path;
use std::sync::Arc;

use crate::resolution::ResolutionEngine;

/// Pact ledger handle
pub struct PactDatabase {
    store: Arc<PactStore>,
    config: LedgerConfig,
    resolver: ResolutionEngine,
    cleaner: Arc<dyn TriggeredRecordCleaner>,
}

impl std::fmt::Debug for PactDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PactDatabase")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for PactDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl PactDatabase {
    /// Empty in-memory ledger with default configuration
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Empty in-memory ledger with `config`
    pub fn with_config(config: LedgerConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Ledger configured from `<dir>/pactledger.toml`
    ///
    /// Writes the default config file first if the directory has none.
    pub fn open_in(dir: impl AsRef<Path>) -> Result<Self> {
        Self::builder().open_in(dir)
    }

    /// Builder for explicit collaborators
    pub fn builder() -> PactDatabaseBuilder {
        PactDatabaseBuilder::new()
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<PactStore> {
        &self.store
    }

    /// Active configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Read side: latest/previous/next, head pacts and WIP classification
    pub fn resolver(&self) -> &ResolutionEngine {
        &self.resolver
    }

    // ========== Version/Tag graph ==========

    /// Create a component, or return the existing one
    pub fn create_component(&self, name: &str) -> Result<Component> {
        self.store.create_component(name)
    }

    /// Create a version of a component, creating the component if needed
    pub fn create_version(&self, component: &str, number: &str) -> Result<Version> {
        self.store.create_version(component, number)
    }

    /// Attach a tag to a version
    pub fn add_tag(&self, version_id: VersionId, name: &str) -> Result<Tag> {
        self.store.add_tag(version_id, name)
    }

    /// Component by name
    pub fn find_component(&self, name: &str) -> Option<Component> {
        self.store.find_component(name)
    }

    /// Version of a named component
    pub fn find_version(&self, component: &str, number: &str) -> Option<Version> {
        self.store.find_version(component, number)
    }

    /// Tag names of a version
    pub fn tag_names(&self, version_id: VersionId) -> Vec<String> {
        self.store.tag_names(version_id)
    }

    // ========== Publication ledger ==========

    /// Publish content under an explicit content hash
    ///
    /// Revises the pair's latest publication if one exists.
    pub fn create(
        &self,
        consumer_version_id: VersionId,
        provider_id: ComponentId,
        sha: &str,
        body: JsonValue,
    ) -> Result<Publication> {
        self.store.create(consumer_version_id, provider_id, sha, body)
    }

    /// Publish content, hashing it canonically
    pub fn publish(
        &self,
        consumer_version_id: VersionId,
        provider_id: ComponentId,
        body: JsonValue,
    ) -> Result<Publication> {
        self.store.publish(consumer_version_id, provider_id, body)
    }

    /// Revise an existing publication
    pub fn revise(&self, id: PublicationId, sha: &str, body: JsonValue) -> Result<Publication> {
        self.store.revise(id, sha, body)
    }

    /// Delete publications between two components, optionally by consumer tag
    pub fn delete_between(&self, consumer: &str, provider: &str, tag: Option<&str>) -> Result<usize> {
        self.store
            .delete_between(consumer, provider, tag, self.cleaner.as_ref())
    }

    /// Delete every revision of one consumer version against `provider`
    pub fn delete(&self, consumer: &str, provider: &str, version_number: &str) -> Result<usize> {
        self.store
            .delete_consumer_version(consumer, provider, version_number, self.cleaner.as_ref())
    }

    /// Delete every publication of a consumer version
    pub fn delete_by_version(&self, version_id: VersionId) -> Result<usize> {
        self.store
            .delete_by_version(version_id, self.cleaner.as_ref())
    }

    /// Delete contents between two components no publication references
    pub fn delete_all_contents_between(&self, consumer: &str, provider: &str) -> Result<usize> {
        self.store
            .delete_unreferenced_contents_between(consumer, provider)
    }

    // ========== Verification ledger ==========

    /// Record a verification of a content by a provider version
    pub fn record_verification(
        &self,
        content_id: ContentId,
        provider_version_id: VersionId,
        success: bool,
    ) -> Result<VerificationResult> {
        self.store
            .record_verification(content_id, provider_version_id, success)
    }

    /// Verifications of a content, oldest first
    pub fn verifications_for(&self, content_id: ContentId) -> Vec<VerificationResult> {
        self.store.verifications_for(content_id)
    }

    // ========== Latest pointer maintenance ==========

    /// Recompute latest pointers from publications
    pub fn repair_latest_pointers(&self) -> usize {
        self.store.repair_latest_pointers()
    }

    /// Pairs whose latest pointer is inconsistent
    pub fn latest_pointer_mismatches(&self) -> Vec<PairKey> {
        self.store.latest_pointer_mismatches()
    }
}
