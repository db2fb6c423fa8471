//! Publication queries
//!
//! Every read access pattern of the ledger is expressed as one
//! [`PublicationQuery`] value handed to [`Catalog::find_pacts`], instead of
//! composing filters incrementally.
//!
//! ```
//! use pactledger_core::TagFilter;
//! use pactledger_storage::PublicationQuery;
//!
//! let query = PublicationQuery::latest_revisions()
//!     .consumer("Foo")
//!     .provider("Bar")
//!     .tag(TagFilter::named("prod"))
//!     .before_order(7);
//! assert_eq!(query.consumer.as_deref(), Some("Foo"));
//! ```

use pactledger_core::{ComponentId, Pact, Publication, TagFilter};
use std::cmp::Ordering;

use crate::catalog::Catalog;

/// Which publication rows a query starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowScope {
    /// Only the latest revision of each (consumer version, provider) pair
    #[default]
    LatestRevision,
    /// Every revision
    AllRevisions,
}

/// Restriction on the consumer version order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBound {
    /// No restriction
    #[default]
    Unbounded,
    /// Strictly before this order
    Before(u64),
    /// Strictly after this order
    After(u64),
}

impl OrderBound {
    fn admits(&self, order: u64) -> bool {
        match *self {
            OrderBound::Unbounded => true,
            OrderBound::Before(bound) => order < bound,
            OrderBound::After(bound) => order > bound,
        }
    }
}

/// Predicate over publications
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationQuery {
    /// Row scope
    pub scope: RowScope,
    /// Consumer name
    pub consumer: Option<String>,
    /// Provider name
    pub provider: Option<String>,
    /// Consumer version number
    pub consumer_version_number: Option<String>,
    /// Consumer version tag restriction
    pub tag: TagFilter,
    /// Consumer version order restriction
    pub order: OrderBound,
    /// Only this content
    pub content_sha: Option<String>,
    /// Anything but this content
    pub exclude_content_sha: Option<String>,
}

impl PublicationQuery {
    /// Query over latest revisions
    pub fn latest_revisions() -> Self {
        Self::default()
    }

    /// Query over every revision
    pub fn all_revisions() -> Self {
        Self {
            scope: RowScope::AllRevisions,
            ..Self::default()
        }
    }

    /// Restrict to a consumer
    pub fn consumer(mut self, name: impl Into<String>) -> Self {
        self.consumer = Some(name.into());
        self
    }

    /// Restrict to a provider
    pub fn provider(mut self, name: impl Into<String>) -> Self {
        self.provider = Some(name.into());
        self
    }

    /// Restrict to a consumer version number
    pub fn consumer_version_number(mut self, number: impl Into<String>) -> Self {
        self.consumer_version_number = Some(number.into());
        self
    }

    /// Restrict by consumer version tags
    pub fn tag(mut self, tag: TagFilter) -> Self {
        self.tag = tag;
        self
    }

    /// Consumer version order strictly before `order`
    pub fn before_order(mut self, order: u64) -> Self {
        self.order = OrderBound::Before(order);
        self
    }

    /// Consumer version order strictly after `order`
    pub fn after_order(mut self, order: u64) -> Self {
        self.order = OrderBound::After(order);
        self
    }

    /// Only publications of this content
    pub fn content_sha(mut self, sha: impl Into<String>) -> Self {
        self.content_sha = Some(sha.into());
        self
    }

    /// Skip publications of this content
    pub fn exclude_content_sha(mut self, sha: impl Into<String>) -> Self {
        self.exclude_content_sha = Some(sha.into());
        self
    }
}

/// Canonical result ordering
///
/// Consumer name (case-insensitive), provider name (case-insensitive),
/// consumer version order, revision.
pub fn display_order(a: &Pact, b: &Pact) -> Ordering {
    a.consumer
        .name
        .to_lowercase()
        .cmp(&b.consumer.name.to_lowercase())
        .then_with(|| {
            a.provider
                .name
                .to_lowercase()
                .cmp(&b.provider.name.to_lowercase())
        })
        .then_with(|| a.consumer_version.order.cmp(&b.consumer_version.order))
        .then_with(|| a.revision_number.cmp(&b.revision_number))
}

impl Catalog {
    /// Resolve a name filter; `Err(())` means the name is unknown
    fn resolve_component(&self, name: Option<&str>) -> Result<Option<ComponentId>, ()> {
        match name {
            None => Ok(None),
            Some(name) => self
                .graph
                .component_by_name(name)
                .map(|c| Some(c.id))
                .ok_or(()),
        }
    }

    /// Run a query, returning pacts in [`display_order`]
    ///
    /// Unknown consumer or provider names match nothing.
    pub fn find_pacts(&self, query: &PublicationQuery) -> Vec<Pact> {
        let Ok(consumer_id) = self.resolve_component(query.consumer.as_deref()) else {
            return Vec::new();
        };
        let Ok(provider_id) = self.resolve_component(query.provider.as_deref()) else {
            return Vec::new();
        };

        let rows: Box<dyn Iterator<Item = &Publication> + '_> = match query.scope {
            RowScope::AllRevisions => Box::new(self.publications.iter()),
            RowScope::LatestRevision => Box::new(
                self.latest
                    .iter()
                    .filter_map(|(_, pointer)| self.publications.get(pointer.publication_id)),
            ),
        };

        let mut pacts: Vec<Pact> = rows
            .filter(|p| consumer_id.map_or(true, |id| p.consumer_id == id))
            .filter(|p| provider_id.map_or(true, |id| p.provider_id == id))
            .filter_map(|p| self.materialize(p))
            .filter(|pact| {
                query
                    .consumer_version_number
                    .as_deref()
                    .map_or(true, |n| pact.consumer_version.number == n)
            })
            .filter(|pact| query.order.admits(pact.consumer_version.order))
            .filter(|pact| query.tag.matches(&pact.consumer_version_tag_names))
            .filter(|pact| {
                query
                    .content_sha
                    .as_deref()
                    .map_or(true, |sha| pact.content_sha == sha)
            })
            .filter(|pact| {
                query
                    .exclude_content_sha
                    .as_deref()
                    .map_or(true, |sha| pact.content_sha != sha)
            })
            .collect();
        pacts.sort_by(display_order);
        pacts
    }
}
