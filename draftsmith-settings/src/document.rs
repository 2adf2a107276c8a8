//! The per-field settings document.
//!
//! A settings document maps category names (e.g. `"general"`,
//! `"appearance"`) to arbitrary structured settings for that category.
//! Categories are written independently; touching one never rewrites a
//! sibling.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Mapping from settings category name to that category's settings object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsDocument {
    categories: BTreeMap<String, Value>,
}

impl SettingsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// The settings for a category. Absent categories resolve to an empty
    /// object — consumers never see null or a missing value.
    pub fn category(&self, name: &str) -> Value {
        self.categories
            .get(name)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// Raw lookup, distinguishing "absent" from "empty".
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.categories.get(name)
    }

    /// Replace one category's settings. Other categories are untouched.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.categories.insert(name.into(), value);
    }

    /// Category names present in the document.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
