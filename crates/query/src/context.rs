//! Query parameter context.

use std::collections::HashMap;

use serde_json::Value;

/// Named parameters supplied by the caller of a query.
///
/// Values are opaque to this layer; adapters consult the context to build
/// positional call arguments and to decide whether a fetch is applicable at
/// all. A context is typically long-lived (one per view) and mutated as the
/// user changes selection.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    values: HashMap<String, Value>,
}

impl QueryContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Removes a parameter.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Returns the raw value of a parameter, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns a parameter rendered as a string.
    ///
    /// String values are returned as-is; other JSON values are rendered in
    /// their compact JSON form, which is how they travel to the backend.
    pub fn get_str(&self, name: &str) -> Option<String> {
        self.values.get(name).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Returns whether every named parameter is present and non-null.
    pub fn has_all(&self, names: &[&str]) -> bool {
        names
            .iter()
            .all(|name| matches!(self.values.get(*name), Some(v) if !v.is_null()))
    }
}
