use std::collections::HashMap;

use crate::types::Identity;

/// Human-readable descriptions keyed by identity.
///
/// Filled while exporting and while reading export files, read when a
/// failure needs to be described. Entries are advisory: the last write for
/// an identity wins and nothing in the engine branches on their presence.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: HashMap<Identity, String>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: Identity, description: impl Into<String>) {
        self.entries.insert(id, description.into());
    }

    pub fn get(&self, id: &Identity) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// The cached description, or `fallback()` when none was recorded.
    pub fn describe_or(&self, id: &Identity, fallback: impl FnOnce() -> String) -> String {
        match self.get(id) {
            Some(description) => description.to_string(),
            None => fallback(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
