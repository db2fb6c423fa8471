//! Version/Tag graph
//!
//! Components, their ordered version history, and the tags attached to
//! versions over time. Writes here are limited to what resolution needs to
//! be populated; everything else is read-only queries:
//! - versions of a component ordered by `order`
//! - does a version carry a tag
//! - first time a component ever used a tag name (min aggregate)
//! - versions strictly before/after a given order

use pactledger_core::{Component, ComponentId, Error, Result, Tag, Timestamp, Version, VersionId};
use rustc_hash::FxHashMap;

/// Components, versions and tags
#[derive(Debug, Default)]
pub struct VersionGraph {
    components: FxHashMap<ComponentId, Component>,
    component_names: FxHashMap<String, ComponentId>,
    versions: FxHashMap<VersionId, Version>,
    version_numbers: FxHashMap<(ComponentId, String), VersionId>,
    /// Last order handed out per component; survives version removal
    last_order: FxHashMap<ComponentId, u64>,
    /// Tags per version, kept sorted by name
    tags: FxHashMap<VersionId, Vec<Tag>>,
    next_component_id: u64,
    next_version_id: u64,
}

impl VersionGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Writes ==========

    /// Create a component, or return the existing one with that name
    pub fn create_component(&mut self, name: &str, now: Timestamp) -> Result<Component> {
        if name.trim().is_empty() {
            return Err(Error::invalid_input("component name must not be empty"));
        }
        if let Some(existing) = self.component_by_name(name) {
            return Ok(existing.clone());
        }
        self.next_component_id += 1;
        let component = Component {
            id: ComponentId::new(self.next_component_id),
            name: name.to_string(),
            created_at: now,
        };
        self.component_names
            .insert(component.name.clone(), component.id);
        self.components.insert(component.id, component.clone());
        Ok(component)
    }

    /// Create a version, or return the existing one with that number
    ///
    /// New versions get the next order value of their component.
    pub fn create_version(
        &mut self,
        component_id: ComponentId,
        number: &str,
        now: Timestamp,
    ) -> Result<Version> {
        if number.trim().is_empty() {
            return Err(Error::invalid_input("version number must not be empty"));
        }
        if !self.components.contains_key(&component_id) {
            return Err(Error::not_found("component", component_id.to_string()));
        }
        if let Some(existing) = self.version_by_number(component_id, number) {
            return Ok(existing.clone());
        }

        let order = self.last_order.entry(component_id).or_insert(0);
        *order += 1;
        self.next_version_id += 1;
        let version = Version {
            id: VersionId::new(self.next_version_id),
            component_id,
            number: number.to_string(),
            order: *order,
            created_at: now,
        };
        self.version_numbers
            .insert((component_id, version.number.clone()), version.id);
        self.versions.insert(version.id, version.clone());
        Ok(version)
    }

    /// Attach a tag to a version
    ///
    /// Re-tagging a version with the same name keeps the original timestamp.
    pub fn add_tag(&mut self, version_id: VersionId, name: &str, now: Timestamp) -> Result<Tag> {
        if name.trim().is_empty() {
            return Err(Error::invalid_input("tag name must not be empty"));
        }
        if !self.versions.contains_key(&version_id) {
            return Err(Error::not_found("version", version_id.to_string()));
        }
        let tags = self.tags.entry(version_id).or_default();
        match tags.binary_search_by(|t| t.name.as_str().cmp(name)) {
            Ok(pos) => Ok(tags[pos].clone()),
            Err(pos) => {
                let tag = Tag {
                    version_id,
                    name: name.to_string(),
                    created_at: now,
                };
                tags.insert(pos, tag.clone());
                Ok(tag)
            }
        }
    }

    // ========== Lookups ==========

    /// Component by id
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Component by exact name
    pub fn component_by_name(&self, name: &str) -> Option<&Component> {
        self.component_names
            .get(name)
            .and_then(|id| self.components.get(id))
    }

    /// Version by id
    pub fn version(&self, id: VersionId) -> Option<&Version> {
        self.versions.get(&id)
    }

    /// Version of a component by number
    pub fn version_by_number(&self, component_id: ComponentId, number: &str) -> Option<&Version> {
        self.version_numbers
            .get(&(component_id, number.to_string()))
            .and_then(|id| self.versions.get(id))
    }

    /// Tags of a version, sorted by name
    pub fn tags(&self, version_id: VersionId) -> &[Tag] {
        self.tags.get(&version_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tag names of a version, sorted
    pub fn tag_names(&self, version_id: VersionId) -> Vec<String> {
        self.tags(version_id).iter().map(|t| t.name.clone()).collect()
    }

    /// Does `version_id` carry tag `name`
    pub fn has_tag(&self, version_id: VersionId, name: &str) -> bool {
        self.tags(version_id)
            .binary_search_by(|t| t.name.as_str().cmp(name))
            .is_ok()
    }

    // ========== Ordered queries ==========

    /// Versions of a component ordered by `order` ascending
    pub fn versions_of(&self, component_id: ComponentId) -> Vec<&Version> {
        let mut versions: Vec<&Version> = self
            .versions
            .values()
            .filter(|v| v.component_id == component_id)
            .collect();
        versions.sort_by_key(|v| v.order);
        versions
    }

    /// Versions with order strictly less than `order`, ascending
    pub fn versions_before(&self, component_id: ComponentId, order: u64) -> Vec<&Version> {
        self.versions_of(component_id)
            .into_iter()
            .filter(|v| v.order < order)
            .collect()
    }

    /// Versions with order strictly greater than `order`, ascending
    pub fn versions_after(&self, component_id: ComponentId, order: u64) -> Vec<&Version> {
        self.versions_of(component_id)
            .into_iter()
            .filter(|v| v.order > order)
            .collect()
    }

    /// First time `component_id` used tag `name` on any of its versions
    pub fn tag_first_used(&self, component_id: ComponentId, name: &str) -> Option<Timestamp> {
        self.tags
            .iter()
            .filter(|(version_id, _)| {
                self.versions
                    .get(version_id)
                    .map_or(false, |v| v.component_id == component_id)
            })
            .flat_map(|(_, tags)| tags.iter())
            .filter(|t| t.name == name)
            .map(|t| t.created_at)
            .min()
    }

    /// First use of each of `names` by `component_id`
    ///
    /// Names the component never used are absent from the result.
    pub fn tags_first_used(
        &self,
        component_id: ComponentId,
        names: &[String],
    ) -> FxHashMap<String, Timestamp> {
        let mut first_used: FxHashMap<String, Timestamp> = FxHashMap::default();
        for (version_id, tags) in &self.tags {
            let owned = self
                .versions
                .get(version_id)
                .map_or(false, |v| v.component_id == component_id);
            if !owned {
                continue;
            }
            for tag in tags.iter().filter(|t| names.contains(&t.name)) {
                first_used
                    .entry(tag.name.clone())
                    .and_modify(|ts| *ts = (*ts).min(tag.created_at))
                    .or_insert(tag.created_at);
            }
        }
        first_used
    }

    /// Versions of `component_id` carrying tag `name`
    pub fn versions_tagged(&self, component_id: ComponentId, name: &str) -> Vec<VersionId> {
        self.tags
            .iter()
            .filter(|(version_id, tags)| {
                tags.iter().any(|t| t.name == name)
                    && self
                        .versions
                        .get(version_id)
                        .map_or(false, |v| v.component_id == component_id)
            })
            .map(|(version_id, _)| *version_id)
            .collect()
    }
}
