//! In-memory store for tests and embedding.

use std::collections::BTreeMap;

use crate::secret::Secret;

use super::{Store, StoreError, validate_name};

/// Store keeping secrets in a sorted in-memory map.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Secret>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Secret)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, Secret)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Store for MemoryStore {
    fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn get(&self, name: &str) -> Result<Secret, StoreError> {
        self.entries.get(name).cloned().ok_or(StoreError::NotFound)
    }

    fn set(&mut self, name: &str, secret: Secret) -> Result<(), StoreError> {
        validate_name(name)?;
        self.entries.insert(name.to_owned(), secret);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}
