//! Ephemeral in-memory storage backend.
//!
//! Provides volatile karuta storage when `storage = "ephemeral"`.
//! All data is lost on restart.

use crate::store::{Entry, UpsertOutcome};
use std::collections::btree_map::{self, BTreeMap};
use std::sync::RwLock;

/// In-memory karuta table, ordered by key
#[derive(Debug, Default)]
pub struct EphemeralIndex {
    entries: RwLock<BTreeMap<String, String>>,
}

impl EphemeralIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<Entry> {
        self.read().get(key).map(|value| Entry {
            key: key.to_string(),
            value: value.clone(),
        })
    }

    /// Insert a new entry. Returns `false` if the key already exists.
    pub fn insert(&self, key: &str, value: &str) -> bool {
        match self.write().entry(key.to_string()) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                true
            }
        }
    }

    /// Replace an existing value. Returns `false` if the key is unknown.
    pub fn update(&self, key: &str, value: &str) -> bool {
        match self.write().get_mut(key) {
            Some(existing) => {
                *existing = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn upsert(&self, key: &str, value: &str) -> UpsertOutcome {
        match self.write().entry(key.to_string()) {
            btree_map::Entry::Occupied(mut slot) => {
                slot.insert(value.to_string());
                UpsertOutcome::Updated
            }
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                UpsertOutcome::Inserted
            }
        }
    }

    pub fn list_all(&self) -> Vec<Entry> {
        self.read()
            .iter()
            .map(|(key, value)| Entry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }
}
