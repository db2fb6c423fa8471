//! Storage layer for the pact ledger
//!
//! This crate implements the in-memory relational store with:
//! - VersionGraph: components, ordered versions and their tags
//! - ContentTable: content-addressed contract bodies
//! - PublicationTable: revision sequences per (consumer version, provider)
//! - LatestPointerIndex: materialized latest revision per pair
//! - VerificationTable: provider verification results
//! - PublicationQuery: the single query object every read goes through
//! - PactStore: RwLock over the catalog plus per-pair revise mutexes
//!
//! # Concurrency
//!
//! The `PactStore` serializes revisions of one pair through a DashMap of
//! pair mutexes while unrelated pairs proceed in parallel. Readers take the
//! catalog read lock and see whole writes only.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod content;
pub mod graph;
pub mod latest;
pub mod ledger;
pub mod maintenance;
pub mod publications;
pub mod query;
pub mod store;
pub mod verifications;

pub use catalog::Catalog;
pub use content::ContentTable;
pub use graph::VersionGraph;
pub use latest::{LatestPointer, LatestPointerIndex};
pub use publications::PublicationTable;
pub use query::{display_order, OrderBound, PublicationQuery, RowScope};
pub use store::PactStore;
pub use verifications::VerificationTable;
