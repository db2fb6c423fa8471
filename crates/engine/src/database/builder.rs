//! Database builder for explicit collaborators
//!
//! Defaults: an empty store on the system clock, [`JsonDiffer`] for
//! structural comparison and no triggered records to clean up.

use pactledger_core::{
    Clock, ContentDiffer, JsonDiffer, NoTriggeredRecords, Result, SystemClock,
    TriggeredRecordCleaner,
};
use pactledger_storage::PactStore;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::config::{LedgerConfig, CONFIG_FILE_NAME};
use super::PactDatabase;
use crate::resolution::ResolutionEngine;

/// Builder for [`PactDatabase`]
pub struct PactDatabaseBuilder {
    config: LedgerConfig,
    store: Option<Arc<PactStore>>,
    clock: Option<Arc<dyn Clock>>,
    differ: Arc<dyn ContentDiffer>,
    cleaner: Arc<dyn TriggeredRecordCleaner>,
}

impl std::fmt::Debug for PactDatabaseBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PactDatabaseBuilder")
            .field("config", &self.config)
            .field("existing_store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for PactDatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PactDatabaseBuilder {
    /// Create new builder with defaults
    pub fn new() -> Self {
        Self {
            config: LedgerConfig::default(),
            store: None,
            clock: None,
            differ: Arc::new(JsonDiffer),
            cleaner: Arc::new(NoTriggeredRecords),
        }
    }

    /// Use `config`
    pub fn config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    /// Open over an existing store instead of an empty one
    ///
    /// With `repair_on_open`, latest pointers are rebuilt on build.
    pub fn store(mut self, store: Arc<PactStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Clock for a new store; ignored when an existing store is given
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Structural content comparison
    pub fn differ(mut self, differ: Arc<dyn ContentDiffer>) -> Self {
        self.differ = differ;
        self
    }

    /// Hook run before publications are deleted
    pub fn cleaner(mut self, cleaner: Arc<dyn TriggeredRecordCleaner>) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Load the config from `<dir>/pactledger.toml` and build
    ///
    /// The default config file is written first if missing.
    pub fn open_in(mut self, dir: impl AsRef<Path>) -> Result<PactDatabase> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(CONFIG_FILE_NAME);
        LedgerConfig::write_default_if_missing(&path)?;
        self.config = LedgerConfig::from_file(&path)?;
        info!(target: "pactledger::store", path = %path.display(), "Loaded ledger config");
        Ok(self.build())
    }

    /// Build the database
    pub fn build(self) -> PactDatabase {
        let store = match self.store {
            Some(existing) => {
                if self.config.repair_on_open {
                    existing.repair_latest_pointers();
                }
                existing
            }
            None => Arc::new(PactStore::with_clock(
                self.clock
                    .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>),
            )),
        };
        let resolver = ResolutionEngine::new(Arc::clone(&store), self.differ, &self.config);
        PactDatabase {
            store,
            config: self.config,
            resolver,
            cleaner: self.cleaner,
        }
    }
}
