//! Ordered fallback chains for fields that live in more than one place
//!
//! A chain is an explicit list of labelled accessors evaluated left to
//! right; the first one yielding a non-empty value wins.

use super::coerce::{has_meaningful_value, sanitize_string};
use serde_json::Value;

/// Resolve a dotted path (`"isagInfo.currentName"`) through nested objects
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// First key of `keys` present on `data` with a meaningful value
pub fn first_present<'a>(data: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| lookup(data, key))
        .find(|value| has_meaningful_value(value))
}

/// Sanitized text of the first meaningful key, or `""`
pub fn first_text(data: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| lookup(data, key))
        .map(sanitize_string)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

type Accessor<'a> = Box<dyn Fn() -> Option<&'a Value> + 'a>;

/// An ordered list of alternate sources for one output field
pub struct FallbackChain<'a> {
    field: &'static str,
    accessors: Vec<(&'static str, Accessor<'a>)>,
}

impl<'a> FallbackChain<'a> {
    /// Start an empty chain for the named output field
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            accessors: Vec::new(),
        }
    }

    /// Append an accessor reading `path` from `source`
    pub fn then(mut self, label: &'static str, source: &'a Value, path: &'static str) -> Self {
        self.accessors
            .push((label, Box::new(move || lookup(source, path))));
        self
    }

    /// Append an arbitrary accessor
    pub fn then_with<F>(mut self, label: &'static str, accessor: F) -> Self
    where
        F: Fn() -> Option<&'a Value> + 'a,
    {
        self.accessors.push((label, Box::new(accessor)));
        self
    }

    /// Labels in evaluation order
    pub fn labels(&self) -> Vec<&'static str> {
        self.accessors.iter().map(|(label, _)| *label).collect()
    }

    /// Label of the accessor that supplies the value, if any
    pub fn winner(&self) -> Option<&'static str> {
        self.accessors
            .iter()
            .find(|(_, accessor)| accessor().map(|v| !sanitize_string(v).is_empty()).unwrap_or(false))
            .map(|(label, _)| *label)
    }

    /// First non-empty sanitized string, or `""`
    pub fn resolve(&self) -> String {
        let resolved = self
            .accessors
            .iter()
            .filter_map(|(_, accessor)| accessor())
            .map(sanitize_string)
            .find(|s| !s.is_empty());

        if resolved.is_none() {
            tracing::trace!(field = self.field, "fallback chain exhausted");
        }
        resolved.unwrap_or_default()
    }

    /// First meaningful raw value, for fields that need further coercion
    pub fn resolve_value(&self) -> Option<&'a Value> {
        self.accessors
            .iter()
            .filter_map(|(_, accessor)| accessor())
            .find(|value| has_meaningful_value(value))
    }
}
