//! Domain entities of the pact ledger
//!
//! One explicit struct per table row: components, versions, tags, contract
//! contents, publications and verification results. Identifiers are typed
//! newtypes so a `VersionId` can never be passed where a `ComponentId` is
//! expected.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

use crate::timestamp::Timestamp;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw row id
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Raw row id
            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Identity of a consumer or provider
    ComponentId
);
row_id!(
    /// Identity of one version of a component
    VersionId
);
row_id!(
    /// Identity of a content-addressed contract body
    ContentId
);
row_id!(
    /// Identity of one publication (one revision slot)
    PublicationId
);
row_id!(
    /// Identity of one verification attempt
    VerificationId
);

/// A consumer or provider, identified by its unique name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Row id
    pub id: ComponentId,
    /// Unique name
    pub name: String,
    /// Creation time
    pub created_at: Timestamp,
}

/// One version of a component
///
/// `order` is assigned at creation from a per-component counter and is
/// never reused, so it orders versions chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Row id
    pub id: VersionId,
    /// Owning component
    pub component_id: ComponentId,
    /// Version number as published (e.g. "1.2.3" or a git sha)
    pub number: String,
    /// Monotonic position within the component's history
    pub order: u64,
    /// Creation time
    pub created_at: Timestamp,
}

/// A named label attached to a version at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tagged version
    pub version_id: VersionId,
    /// Tag name
    pub name: String,
    /// When the tag was attached
    pub created_at: Timestamp,
}

/// Content-addressed contract body scoped to a (consumer, provider) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractContent {
    /// Row id
    pub id: ContentId,
    /// Consumer the content belongs to
    pub consumer_id: ComponentId,
    /// Provider the content is addressed to
    pub provider_id: ComponentId,
    /// Hash of the canonicalized body
    pub sha: String,
    /// Parsed body
    pub body: Arc<JsonValue>,
    /// Creation time
    pub created_at: Timestamp,
}

/// One act of a consumer version publishing its expectations of a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Row id
    pub id: PublicationId,
    /// Consumer component (denormalized from the version)
    pub consumer_id: ComponentId,
    /// Publishing consumer version
    pub consumer_version_id: VersionId,
    /// Provider the contract is addressed to
    pub provider_id: ComponentId,
    /// Bound content
    pub content_id: ContentId,
    /// 1-based revision within (consumer_version, provider)
    pub revision_number: u32,
    /// Creation time
    pub created_at: Timestamp,
}

impl Publication {
    /// The (consumer_version, provider) pair this publication revises
    pub fn pair(&self) -> PairKey {
        PairKey {
            consumer_version_id: self.consumer_version_id,
            provider_id: self.provider_id,
        }
    }
}

/// Key of a revision sequence: one consumer version against one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    /// Consumer version
    pub consumer_version_id: VersionId,
    /// Provider
    pub provider_id: ComponentId,
}

/// A provider's attempt to fulfil a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Row id
    pub id: VerificationId,
    /// Verified content
    pub content_id: ContentId,
    /// Provider version that ran the verification
    pub provider_version_id: VersionId,
    /// Outcome
    pub success: bool,
    /// Creation time
    pub created_at: Timestamp,
}
