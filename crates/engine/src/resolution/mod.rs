//! Resolution engine
//!
//! Computes latest, previous, next and distinct-previous pacts, head pacts
//! and the work-in-progress classification over a [`PactStore`].
//!
//! Every call takes one read lock on the store and computes its answer from
//! that single consistent view. A call racing a concurrent revise observes
//! either the state before it or after it.
//!
//! - `latest`: latest/previous/next traversal and the finder queries
//! - `heads`: head pacts per consumer and per consumer tag
//! - `wip`: provider-tag-aware WIP classification

mod heads;
mod latest;
mod wip;

pub use heads::HeadPact;

use pactledger_core::ContentDiffer;
use pactledger_storage::PactStore;
use std::sync::Arc;

use crate::database::LedgerConfig;

/// Read-only resolver over an explicit store handle
#[derive(Clone)]
pub struct ResolutionEngine {
    store: Arc<PactStore>,
    differ: Arc<dyn ContentDiffer>,
    allow_unexpected_keys: bool,
    wip_candidate_limit: Option<usize>,
}

impl std::fmt::Debug for ResolutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionEngine")
            .field("allow_unexpected_keys", &self.allow_unexpected_keys)
            .field("wip_candidate_limit", &self.wip_candidate_limit)
            .finish_non_exhaustive()
    }
}

impl ResolutionEngine {
    /// Create a resolver for `store`, diffing contents with `differ`
    pub fn new(store: Arc<PactStore>, differ: Arc<dyn ContentDiffer>, config: &LedgerConfig) -> Self {
        Self {
            store,
            differ,
            allow_unexpected_keys: config.allow_unexpected_keys,
            wip_candidate_limit: config.candidate_limit(),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<PactStore> {
        &self.store
    }
}
