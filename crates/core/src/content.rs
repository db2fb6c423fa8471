//! Contract content hashing and structural comparison
//!
//! Content identity is the SHA-256 of the canonical JSON serialization:
//! object keys sorted at every depth, no insignificant whitespace. Two
//! bodies that differ only in key order hash identically, whatever map
//! representation `serde_json` was built with.

use serde_json::{Map, Value as JsonValue};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Copy of `value` with every object's keys inserted in sorted order
///
/// Insertion order is the serialization order for both the default
/// `BTreeMap` maps and `preserve_order` maps.
pub fn canonicalize(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(keys.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key.as_str()]));
            }
            JsonValue::Object(sorted)
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(canonicalize).collect()),
        scalar => scalar.clone(),
    }
}

/// Canonical hash of a contract body
pub fn content_sha(body: &JsonValue) -> Result<String> {
    let canonical = serde_json::to_vec(&canonicalize(body))?;
    let digest = Sha256::digest(&canonical);
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

/// Structural comparison of two contract bodies
pub trait ContentDiffer: Send + Sync {
    /// True if `actual` does not satisfy `expected`
    ///
    /// With `allow_unexpected_keys`, object keys present only in `actual`
    /// are not a difference.
    fn differs(&self, expected: &JsonValue, actual: &JsonValue, allow_unexpected_keys: bool)
        -> bool;
}

/// Recursive JSON differ
///
/// Objects are compared key by key, arrays element by element, scalars by
/// equality.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDiffer;

impl ContentDiffer for JsonDiffer {
    fn differs(
        &self,
        expected: &JsonValue,
        actual: &JsonValue,
        allow_unexpected_keys: bool,
    ) -> bool {
        match (expected, actual) {
            (JsonValue::Object(exp), JsonValue::Object(act)) => {
                if !allow_unexpected_keys && act.keys().any(|k| !exp.contains_key(k)) {
                    return true;
                }
                exp.iter().any(|(key, exp_val)| match act.get(key) {
                    Some(act_val) => self.differs(exp_val, act_val, allow_unexpected_keys),
                    None => true,
                })
            }
            (JsonValue::Array(exp), JsonValue::Array(act)) => {
                exp.len() != act.len()
                    || exp
                        .iter()
                        .zip(act.iter())
                        .any(|(e, a)| self.differs(e, a, allow_unexpected_keys))
            }
            _ => expected != actual,
        }
    }
}
