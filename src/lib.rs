//! Pactledger - contract publication ledger with pact resolution
//!
//! Tracks the contracts ("pacts") consumers publish against providers, across
//! versions and revisions, and resolves which of them are latest, previous,
//! or still work in progress for a provider and its tags.
//!
//! # Quick Start
//!
//! ```
//! use pactledger::{PactDatabase, TagFilter, Timestamp};
//! use serde_json::json;
//!
//! let db = PactDatabase::new();
//! let bar = db.create_component("Bar")?;
//! let foo1 = db.create_version("Foo", "1.0.0")?;
//! db.publish(foo1.id, bar.id, json!({"interactions": []}))?;
//!
//! let latest = db.resolver().latest_for("Bar", &TagFilter::Any);
//! assert_eq!(latest[0].consumer_name(), "Foo");
//!
//! let wip = db.resolver().wip_pacts("Bar", &["prod"], Timestamp::EPOCH);
//! assert!(wip.is_empty());
//! # Ok::<(), pactledger::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `pactledger-core`: entities, errors, timestamps, hashing and diffing
//! - `pactledger-storage`: the in-memory tables behind one `PactStore`
//! - `pactledger-engine`: `PactDatabase`, configuration and resolution

pub use pactledger_core::*;
pub use pactledger_engine::*;
pub use pactledger_storage::{Catalog, PactStore, PublicationQuery};
