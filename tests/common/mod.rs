//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

pub use pactledger::{
    Component, ConsumerVersionSelector, LedgerConfig, ManualClock, Pact, PactDatabase,
    Publication, TagFilter, Timestamp, VerifiablePact, Version,
};
pub use serde_json::{json, Value as JsonValue};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness when `RUST_LOG` is set.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        if std::env::var_os("RUST_LOG").is_some() {
            let _ = tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(tracing::Level::DEBUG)
                .try_init();
        }
    });
}

/// Seconds since the epoch as a timestamp
pub fn t(secs: u64) -> Timestamp {
    Timestamp::from_secs(secs)
}

// ============================================================================
// TestLedger - database on a manual clock
// ============================================================================

/// Ledger whose rows are stamped by a clock the test controls.
pub struct TestLedger {
    pub db: PactDatabase,
    pub clock: Arc<ManualClock>,
}

impl TestLedger {
    /// Empty ledger with the clock at T0.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Empty ledger with `config` and the clock at T0.
    pub fn with_config(config: LedgerConfig) -> Self {
        init_tracing();
        let clock = Arc::new(ManualClock::new(t(0)));
        let db = PactDatabase::builder()
            .config(config)
            .clock(clock.clone())
            .build();
        TestLedger { db, clock }
    }

    /// Move the clock to `secs`.
    pub fn at(&self, secs: u64) -> &Self {
        self.clock.set(t(secs));
        self
    }

    /// Advance the clock by `secs`.
    pub fn advance(&self, secs: u64) {
        self.clock.advance(Duration::from_secs(secs));
    }

    /// Get or create a component.
    pub fn component(&self, name: &str) -> Component {
        self.db.create_component(name).unwrap()
    }

    /// Get or create a version, attaching `tags`.
    pub fn version(&self, component: &str, number: &str, tags: &[&str]) -> Version {
        let version = self.db.create_version(component, number).unwrap();
        for tag in tags {
            self.db.add_tag(version.id, tag).unwrap();
        }
        version
    }

    /// Publish `body` from `consumer` version `number` to `provider`.
    pub fn publish(&self, consumer: &str, number: &str, provider: &str, body: JsonValue) -> Publication {
        let version = self.version(consumer, number, &[]);
        let provider = self.component(provider);
        self.db.publish(version.id, provider.id, body).unwrap()
    }

    /// Materialized pact of a publication.
    pub fn pact(&self, publication: &Publication) -> Pact {
        self.db
            .store()
            .read(|c| c.pact(publication.id))
            .unwrap()
    }

    /// Record a verification of `publication`'s content by a provider version
    /// carrying `tags`.
    pub fn verify(
        &self,
        publication: &Publication,
        provider: &str,
        provider_version: &str,
        tags: &[&str],
        success: bool,
    ) {
        let version = self.version(provider, provider_version, tags);
        self.db
            .record_verification(publication.content_id, version.id, success)
            .unwrap();
    }
}

/// Consumer version numbers of `pacts`, in order.
pub fn version_numbers(pacts: &[Pact]) -> Vec<String> {
    pacts
        .iter()
        .map(|p| p.consumer_version_number().to_string())
        .collect()
}

/// Consumer names of `pacts`, in order.
pub fn consumer_names(pacts: &[Pact]) -> Vec<String> {
    pacts.iter().map(|p| p.consumer_name().to_string()).collect()
}
