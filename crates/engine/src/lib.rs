//! Resolution engine for the pact ledger
//!
//! This crate sits on top of the store:
//! - PactDatabase: ledger handle with open/config and the write API
//! - LedgerConfig: `pactledger.toml` settings
//! - ResolutionEngine: latest/previous/next, distinct-previous, head pacts
//!   and WIP classification
//!
//! The engine is the only component that knows about:
//! - Cross-table resolution (publications, tags, verifications)
//! - The content differ and the webhook cleanup hook
//! - Configuration files

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod resolution;

pub use database::{LedgerConfig, PactDatabase, PactDatabaseBuilder, CONFIG_FILE_NAME};
pub use resolution::{HeadPact, ResolutionEngine};
