//! Per-item parameter access by name, with defaults for optional fields.

use serde_json::{Map, Value};

use super::dispatch::NodeError;

/// Read-only view over one input item's parameter object. Parameter names match
/// the node property descriptors (camelCase, with options nested in collections).
pub struct ItemParams<'a> {
    item: usize,
    values: &'a Map<String, Value>,
}

impl<'a> ItemParams<'a> {
    pub fn new(item: usize, values: &'a Map<String, Value>) -> Self {
        Self { item, values }
    }

    /// Index of this item in the input batch.
    pub fn index(&self) -> usize {
        self.item
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    /// String parameter with a default for absent values.
    pub fn str_or(&self, name: &str, default: &str) -> String {
        self.value(name)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
            .to_string()
    }

    /// String parameter that must be present and non-empty.
    pub fn required_str(&self, name: &str) -> Result<String, NodeError> {
        let v = self.str_or(name, "");
        if v.is_empty() {
            return Err(NodeError::Validation {
                item: self.item,
                message: format!("missing required parameter '{}'", name),
            });
        }
        Ok(v)
    }

    /// String parameter mapped to None when absent or empty (sparse-body fields).
    pub fn non_empty(&self, name: &str) -> Option<String> {
        let v = self.str_or(name, "");
        if v.is_empty() {
            None
        } else {
            Some(v)
        }
    }

    /// Integer parameter with a default.
    pub fn u64_or(&self, name: &str, default: u64) -> u64 {
        self.value(name).and_then(|v| v.as_u64()).unwrap_or(default)
    }

    /// Non-empty string from a nested options collection (e.g. sendOptions.cc).
    pub fn nested_non_empty(&self, collection: &str, name: &str) -> Option<String> {
        self.value(collection)
            .and_then(|v| v.as_object())
            .and_then(|m| m.get(name))
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Split a comma-separated address list into trimmed entries.
pub fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}
