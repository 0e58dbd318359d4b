//! In-memory storage

use rustc_hash::FxHashMap;

use super::{Storage, StorageError};

/// Storage held in process memory.
///
/// An optional quota caps the total number of bytes held across all keys and
/// values, the way browser local storage refuses writes once it is full.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that holds at most `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            quota: Some(quota),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let requested = self.used_bytes_without(key) + key.len() + value.len();

            if requested > quota {
                return Err(StorageError::QuotaExceeded(quota, requested));
            }
        }

        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);

        Ok(())
    }
}
