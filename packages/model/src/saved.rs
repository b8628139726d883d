//! Persisted form of a rule tree.
//!
//! Storage location is up to the caller; this module only fixes the record
//! shape and a minimal key-value store contract.

use crate::tree::RuleTree;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A named rule tree with bookkeeping metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuery {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub tree: RuleTree,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedQuery {
    pub fn new(name: impl Into<String>, tree: RuleTree) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: None,
            tags: Vec::new(),
            tree,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the tree and bump `updated_at`
    pub fn update_tree(&mut self, tree: RuleTree) {
        self.tree = tree;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Key-value store for saved queries
pub trait QueryStore {
    fn get(&self, key: &str) -> Option<SavedQuery>;

    /// Insert or replace; stamps `updated_at`
    fn put(&mut self, key: &str, query: SavedQuery) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Option<SavedQuery>;

    /// Keys in ascending order
    fn list(&self) -> Vec<String>;
}

/// In-memory store, mostly for tests and ephemeral sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryQueryStore {
    entries: BTreeMap<String, SavedQuery>,
}

impl MemoryQueryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl QueryStore for MemoryQueryStore {
    fn get(&self, key: &str) -> Option<SavedQuery> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, mut query: SavedQuery) -> Result<(), StoreError> {
        if key.trim().is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        query.touch();
        self.entries.insert(key.to_string(), query);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Option<SavedQuery> {
        self.entries.remove(key)
    }

    fn list(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
