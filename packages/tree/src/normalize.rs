//! Canonical key ordering for JSON-like trees.
//!
//! Hosts are free to reorder object fields when they store and reload a
//! document. Normalizing before serialization makes two structurally equal
//! values serialize to the same bytes. Array order is semantic and is kept.

use serde_json::{Map, Value};

/// Recursively sort the keys of every object in `value`.
pub fn normalize_tree(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                if let Some(child) = map.get(key) {
                    sorted.insert(key.clone(), normalize_tree(child));
                }
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_tree).collect()),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => value.clone(),
    }
}

/// Serialize a value in canonical form (normalized, compact).
pub fn canonical_string(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(&normalize_tree(value))
}
