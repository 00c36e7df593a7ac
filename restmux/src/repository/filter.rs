//! Flat property filter handed to providers
//!
//! Keys are trimmed and lower-cased, and empty keys are dropped. Values are
//! always strings: JSON strings are trimmed, every other JSON value keeps its
//! JSON text (`true`, `42`, `null`, `{"a":1}`). Comparison against items is
//! therefore string-based.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// String-keyed filter narrowing a collection fetch
///
/// # Example
///
/// ```rust
/// use restmux::repository::PropertyFilter;
///
/// let filter = PropertyFilter::parse_json(r#"{" Name ": " Bob ", "Age": 42}"#);
/// assert_eq!(filter.get("name"), Some("Bob"));
/// assert_eq!(filter.get("age"), Some("42"));
///
/// assert!(PropertyFilter::parse_json("not json").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFilter(BTreeMap<String, String>);

impl PropertyFilter {
    /// Empty filter, matching everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object; anything else yields an empty filter
    pub fn parse_json(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::new();
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => {
                let mut filter = Self::new();
                for (key, value) in map {
                    filter.insert(&key, render(&value, true));
                }
                filter
            }
            Ok(_) => {
                tracing::warn!(filter = raw, "Ignoring filter that is not a JSON object");
                Self::new()
            }
            Err(e) => {
                tracing::warn!(filter = raw, error = %e, "Failed to deserialize filter");
                Self::new()
            }
        }
    }

    /// Add a condition; the key is normalized and empty keys are ignored
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        self.0.insert(key, value.into());
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value for a normalized key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether no condition is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of conditions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Conditions in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether every condition holds for the serialized form of `item`
    ///
    /// Field names are compared case-insensitively at the top level only.
    /// A field must exist and its rendered value must equal the filter
    /// value exactly. Items that do not serialize to an object only match
    /// the empty filter.
    pub fn matches_json<T: Serialize>(&self, item: &T) -> bool {
        if self.is_empty() {
            return true;
        }
        let Ok(Value::Object(fields)) = serde_json::to_value(item) else {
            return false;
        };

        self.0.iter().all(|(key, expected)| {
            fields
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
                .is_some_and(|(_, value)| render(value, false) == *expected)
        })
    }
}

impl FromIterator<(String, String)> for PropertyFilter {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut filter = Self::new();
        for (key, value) in iter {
            filter.insert(&key, value);
        }
        filter
    }
}

fn render(value: &Value, trim: bool) -> String {
    match value {
        Value::String(s) if trim => s.trim().to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
