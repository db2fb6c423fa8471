//! Content store
//!
//! Content-addressed contract bodies keyed by (consumer, provider, sha).
//! A body is created at most once per key and never changes afterwards;
//! publications reference it by id.

use pactledger_core::{ComponentId, ContentId, ContractContent, Error, Result, Timestamp};
use rustc_hash::FxHashMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;

type ContentKey = (ComponentId, ComponentId, String);

/// Table of contract contents
#[derive(Debug, Default)]
pub struct ContentTable {
    rows: FxHashMap<ContentId, ContractContent>,
    by_key: FxHashMap<ContentKey, ContentId>,
    next_id: u64,
}

impl ContentTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Content by id
    pub fn get(&self, id: ContentId) -> Option<&ContractContent> {
        self.rows.get(&id)
    }

    /// Content by its identity key
    pub fn find(
        &self,
        consumer_id: ComponentId,
        provider_id: ComponentId,
        sha: &str,
    ) -> Option<&ContractContent> {
        self.by_key
            .get(&(consumer_id, provider_id, sha.to_string()))
            .and_then(|id| self.rows.get(id))
    }

    /// Return the existing content for the key, or create it
    ///
    /// # Errors
    ///
    /// `ContentCreation` when the sha is empty.
    pub fn find_or_create(
        &mut self,
        consumer_id: ComponentId,
        provider_id: ComponentId,
        sha: &str,
        body: JsonValue,
        now: Timestamp,
    ) -> Result<ContentId> {
        if sha.trim().is_empty() {
            return Err(Error::ContentCreation(
                "content sha must not be empty".to_string(),
            ));
        }
        if let Some(existing) = self.find(consumer_id, provider_id, sha) {
            return Ok(existing.id);
        }

        self.next_id += 1;
        let content = ContractContent {
            id: ContentId::new(self.next_id),
            consumer_id,
            provider_id,
            sha: sha.to_string(),
            body: Arc::new(body),
            created_at: now,
        };
        let id = content.id;
        self.by_key
            .insert((consumer_id, provider_id, content.sha.clone()), id);
        self.rows.insert(id, content);
        Ok(id)
    }

    /// Ids of every content scoped to (consumer, provider)
    pub fn ids_between(&self, consumer_id: ComponentId, provider_id: ComponentId) -> Vec<ContentId> {
        let mut ids: Vec<ContentId> = self
            .rows
            .values()
            .filter(|c| c.consumer_id == consumer_id && c.provider_id == provider_id)
            .map(|c| c.id)
            .collect();
        ids.sort();
        ids
    }

    /// Remove a content row
    pub fn remove(&mut self, id: ContentId) -> Option<ContractContent> {
        let removed = self.rows.remove(&id)?;
        self.by_key
            .remove(&(removed.consumer_id, removed.provider_id, removed.sha.clone()));
        Some(removed)
    }

    /// Number of contents
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
