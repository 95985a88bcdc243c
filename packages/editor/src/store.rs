//! Document store boundary
//!
//! The surrounding application owns the documents; operations receive the
//! store as an explicit capability and follow "read whole field, compute the
//! new value, write whole field back".

use crate::document::Document;
use crate::errors::StoreError;
use crate::history::FieldWithHistory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

pub type DocumentField = FieldWithHistory<Document>;

pub trait DocumentStore {
    /// Copy of the field stored under `fragment_id`
    fn get(&self, fragment_id: &str) -> Option<DocumentField>;

    fn set(&mut self, fragment_id: &str, field: DocumentField) -> Result<(), StoreError>;

    /// Record whether `pane_id` has unsaved document changes
    fn mark_unsaved(&mut self, pane_id: &str, unsaved: bool);

    fn is_unsaved(&self, pane_id: &str) -> bool;
}

/// In-memory store, also the JSON fragments file format of the CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStore {
    #[serde(default)]
    pub fragments: BTreeMap<String, DocumentField>,

    /// Unsaved flag per pane id
    #[serde(default)]
    pub unsaved: BTreeMap<String, bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly loaded document
    pub fn insert(&mut self, fragment_id: impl Into<String>, doc: Document) {
        self.fragments
            .insert(fragment_id.into(), FieldWithHistory::new(doc));
    }

    pub fn current(&self, fragment_id: &str) -> Option<&Document> {
        self.fragments.get(fragment_id).map(|field| &field.current)
    }

    pub fn fragment_ids(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let store: MemoryStore = serde_json::from_str(&content)?;
        debug!(path = %path.display(), fragments = store.fragments.len(), "Loaded store");
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        debug!(path = %path.display(), fragments = self.fragments.len(), "Saved store");
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, fragment_id: &str) -> Option<DocumentField> {
        self.fragments.get(fragment_id).cloned()
    }

    fn set(&mut self, fragment_id: &str, field: DocumentField) -> Result<(), StoreError> {
        self.fragments.insert(fragment_id.to_string(), field);
        Ok(())
    }

    fn mark_unsaved(&mut self, pane_id: &str, unsaved: bool) {
        self.unsaved.insert(pane_id.to_string(), unsaved);
    }

    fn is_unsaved(&self, pane_id: &str) -> bool {
        self.unsaved.get(pane_id).copied().unwrap_or(false)
    }
}
