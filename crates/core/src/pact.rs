//! Resolved pact views handed to callers
//!
//! A [`Pact`] is a publication joined with everything a reader needs:
//! consumer, provider, consumer version, its tag names and the bound
//! content. [`VerifiablePact`] wraps a pact with its WIP classification.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

use crate::timestamp::Timestamp;
use crate::types::{Component, ContentId, PublicationId, VerificationResult, Version};

/// Consumer-version tag restriction for resolution queries
///
/// "No restriction", "only versions without any tag" and "only versions
/// carrying this tag" are distinct choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagFilter {
    /// No tag restriction
    #[default]
    Any,
    /// Only versions carrying no tag at all
    Untagged,
    /// Only versions carrying this tag
    Named(String),
}

impl TagFilter {
    /// Restrict to a named tag
    pub fn named(name: impl Into<String>) -> Self {
        TagFilter::Named(name.into())
    }

    /// `None` means no restriction
    pub fn from_option(tag: Option<&str>) -> Self {
        match tag {
            Some(name) => TagFilter::named(name),
            None => TagFilter::Any,
        }
    }

    /// Does a version carrying `tag_names` pass this filter
    pub fn matches<S: AsRef<str>>(&self, tag_names: &[S]) -> bool {
        match self {
            TagFilter::Any => true,
            TagFilter::Untagged => tag_names.is_empty(),
            TagFilter::Named(name) => tag_names.iter().any(|t| t.as_ref() == name),
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagFilter::Any => write!(f, "*"),
            TagFilter::Untagged => write!(f, "untagged"),
            TagFilter::Named(name) => write!(f, "{}", name),
        }
    }
}

/// A publication joined with its consumer, provider, version and content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pact {
    /// Publication row id
    pub id: PublicationId,
    /// Consumer component
    pub consumer: Component,
    /// Provider component
    pub provider: Component,
    /// Publishing consumer version
    pub consumer_version: Version,
    /// Tags carried by the consumer version, sorted by name
    pub consumer_version_tag_names: Vec<String>,
    /// Revision within the (consumer version, provider) pair
    pub revision_number: u32,
    /// Bound content
    pub content_id: ContentId,
    /// Canonical hash of the bound content
    pub content_sha: String,
    /// Bound content body
    pub content: Arc<JsonValue>,
    /// Publication time
    pub created_at: Timestamp,
}

impl Pact {
    /// Consumer name
    pub fn consumer_name(&self) -> &str {
        &self.consumer.name
    }

    /// Provider name
    pub fn provider_name(&self) -> &str {
        &self.provider.name
    }

    /// Consumer version number
    pub fn consumer_version_number(&self) -> &str {
        &self.consumer_version.number
    }

    /// Consumer version order
    pub fn consumer_version_order(&self) -> u64 {
        self.consumer_version.order
    }
}

impl fmt::Display for Pact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pact between {} ({}) and {} rev {}",
            self.consumer.name, self.consumer_version.number, self.provider.name, self.revision_number
        )
    }
}

/// A pact selected for provider verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiablePact {
    /// The resolved pact
    pub pact: Pact,
    /// Verification failures must not fail the provider build
    pub pending: bool,
    /// Provider tags the pact is still pending for
    pub pending_provider_tags: Vec<String>,
    /// Provider tags the pact has already been verified under
    pub non_pending_provider_tags: Vec<String>,
    /// Consumer tags for which this pact is the head
    pub head_consumer_tag_names: Vec<String>,
    /// Earliest verification of the pact's content, if any
    pub first_verification: Option<VerificationResult>,
    /// Work-in-progress marker
    pub wip: bool,
}

impl VerifiablePact {
    /// A WIP pact pending for `pending_provider_tags`
    pub fn wip(
        pact: Pact,
        pending_provider_tags: Vec<String>,
        head_consumer_tag_names: Vec<String>,
    ) -> Self {
        Self {
            pact,
            pending: true,
            pending_provider_tags,
            non_pending_provider_tags: Vec::new(),
            head_consumer_tag_names,
            first_verification: None,
            wip: true,
        }
    }

    /// A regular, non-pending pact
    pub fn verified(
        pact: Pact,
        head_consumer_tag_names: Vec<String>,
        first_verification: Option<VerificationResult>,
    ) -> Self {
        Self {
            pact,
            pending: false,
            pending_provider_tags: Vec::new(),
            non_pending_provider_tags: Vec::new(),
            head_consumer_tag_names,
            first_verification,
            wip: false,
        }
    }
}

/// Which consumer versions a provider wants to verify
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsumerVersionSelector {
    /// Consumer tag to select by
    pub tag: Option<String>,
    /// Only the latest version for the tag
    pub latest: bool,
}

impl ConsumerVersionSelector {
    /// Latest consumer version carrying `tag`
    pub fn latest_for_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            latest: true,
        }
    }
}
