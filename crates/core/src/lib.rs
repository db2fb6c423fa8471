//! Core types and traits for the pact ledger
//!
//! This crate defines the foundational types used throughout the system:
//! - Row identifiers: ComponentId, VersionId, ContentId, PublicationId, VerificationId
//! - Entities: Component, Version, Tag, ContractContent, Publication, VerificationResult
//! - Resolved views: Pact, VerifiablePact, TagFilter, ConsumerVersionSelector
//! - Timestamp and the injected Clock
//! - Content hashing and the structural ContentDiffer
//! - Error: Error type hierarchy
//! - Traits: collaborator hooks (TriggeredRecordCleaner)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod content;
pub mod error;
pub mod pact;
pub mod timestamp;
pub mod traits;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use content::{canonicalize, content_sha, ContentDiffer, JsonDiffer};
pub use error::{Error, Result};
pub use pact::{ConsumerVersionSelector, Pact, TagFilter, VerifiablePact};
pub use timestamp::Timestamp;
pub use traits::{NoTriggeredRecords, TriggeredRecordCleaner};
pub use types::{
    Component, ComponentId, ContentId, ContractContent, PairKey, Publication, PublicationId, Tag,
    VerificationId, VerificationResult, Version, VersionId,
};
