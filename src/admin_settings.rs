// ABOUTME: In-memory store of fields submitted through the admin settings update endpoint
// ABOUTME: Keeps every submitted key per username and overlays them onto the base settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use dashmap::DashMap;
use serde_json::{Map, Value};

/// How an update combines with earlier submissions from the same user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// `PUT`: the submission replaces the user's previous fields
    Replace,
    /// `PATCH`: the submission is merged over the user's previous fields
    Merge,
}

/// Per-user settings overrides, lost on restart
#[derive(Debug, Default)]
pub struct SettingsStore {
    overrides: DashMap<String, Map<String, Value>>,
}

impl SettingsStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `fields` for `username` and return what is now held for them
    pub fn apply(
        &self,
        username: &str,
        fields: Map<String, Value>,
        mode: UpdateMode,
    ) -> Map<String, Value> {
        let mut entry = self.overrides.entry(username.to_owned()).or_default();
        match mode {
            UpdateMode::Replace => *entry = fields,
            UpdateMode::Merge => entry.extend(fields),
        }
        entry.value().clone()
    }

    /// Fields held for `username`
    #[must_use]
    pub fn overrides_for(&self, username: &str) -> Option<Map<String, Value>> {
        self.overrides.get(username).map(|entry| entry.value().clone())
    }

    /// Number of users with stored overrides
    #[must_use]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Whether nothing has been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Overlay every user's fields onto `base`, in username order
    #[must_use]
    pub fn overlay(&self, base: Value) -> Value {
        let Value::Object(mut settings) = base else {
            return base;
        };
        let mut usernames: Vec<String> = self.overrides.iter().map(|e| e.key().clone()).collect();
        usernames.sort();
        for username in usernames {
            if let Some(fields) = self.overrides.get(&username) {
                settings.extend(fields.value().clone());
            }
        }
        Value::Object(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_replace_and_merge() {
        let store = SettingsStore::new();
        store.apply("user1", fields(json!({"a": 1, "b": 2})), UpdateMode::Replace);
        let merged = store.apply("user1", fields(json!({"b": 3})), UpdateMode::Merge);
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 3}));

        let replaced = store.apply("user1", fields(json!({"c": 4})), UpdateMode::Replace);
        assert_eq!(Value::Object(replaced), json!({"c": 4}));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_overlay_onto_base() {
        let store = SettingsStore::new();
        store.apply("mallory", fields(json!({"maintenanceMode": true})), UpdateMode::Replace);

        let settings = store.overlay(json!({"maintenanceMode": false, "version": "v3.2.1"}));
        assert_eq!(settings["maintenanceMode"], true);
        assert_eq!(settings["version"], "v3.2.1");
    }
}
