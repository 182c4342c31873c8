//! Header record type for structured detector images.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata header carried alongside pixel data: an ordered mapping from
/// string keys to scalar values, exposed directly rather than through the
/// positional wrapper some source formats use.
///
/// Keys iterate in sorted order so diagnostic output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderRecord {
    entries: BTreeMap<String, String>,
}

impl HeaderRecord {
    /// Create an empty header record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair, replacing any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up the raw string value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the record contains a key
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over key/value pairs in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of keys in the record
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the value for a key as f64, if present and well-formed
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Parse the value for a key as usize, if present and well-formed
    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }
}
