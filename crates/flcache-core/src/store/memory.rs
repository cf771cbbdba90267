//! Map-backed store with no durability.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::CacheResult;
use crate::model::{CacheEntry, CacheKey};

use super::PersistentStore;

/// A [`PersistentStore`] that keeps records in process memory.
///
/// Used as a fake in tests and as the fallback when no store directory can
/// be determined. Records live as long as the store value does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistentStore for MemoryStore {
    fn save(&self, key: &CacheKey, entry: &CacheEntry) -> CacheResult<()> {
        self.records().insert(key.clone(), entry.clone());
        Ok(())
    }

    fn read(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>> {
        Ok(self.records().get(key).cloned())
    }

    fn remove(&self, key: &CacheKey) -> CacheResult<()> {
        self.records().remove(key);
        Ok(())
    }

    fn clear(&self) -> CacheResult<()> {
        self.records().clear();
        Ok(())
    }
}
