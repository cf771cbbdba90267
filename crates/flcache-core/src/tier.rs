//! Bounded, cost-weighted in-memory listing cache.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lru::LruCache;

use crate::model::{CacheEntry, CacheKey};

/// Default aggregate capacity of the memory tier, in cost units (listing items).
pub const DEFAULT_MEMORY_CAPACITY: u64 = 1_000_000;

struct Slot {
    entry: Arc<CacheEntry>,
    cost: u64,
}

struct TierState {
    entries: LruCache<CacheKey, Slot>,
    used: u64,
}

/// The fast tier: an LRU map from [`CacheKey`] to shared [`CacheEntry`] snapshots.
///
/// Every entry is charged a cost and the sum of costs never exceeds the
/// capacity. Inserting past the limit evicts least-recently-used entries
/// until the new one fits; an entry whose cost alone exceeds the capacity is
/// rejected.
///
/// All access goes through one short-lived lock, so concurrent producers can
/// call [`MemoryTier::set`] without corrupting the map or the cost counter.
pub struct MemoryTier {
    state: Mutex<TierState>,
    capacity: u64,
}

impl MemoryTier {
    pub fn new(capacity: u64) -> Self {
        Self {
            state: Mutex::new(TierState {
                entries: LruCache::unbounded(),
                used: 0,
            }),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TierState> {
        // Entries are immutable Arcs, so the state is consistent even after a panic.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up `key`, marking it most recently used.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.lock()
            .entries
            .get(key)
            .map(|slot| Arc::clone(&slot.entry))
    }

    /// Inserts or replaces the entry under `key`.
    ///
    /// Returns `false` when `cost` exceeds the whole capacity; in that case
    /// any older entry under `key` is dropped too, since it is superseded.
    pub fn set(&self, key: CacheKey, entry: Arc<CacheEntry>, cost: u64) -> bool {
        let mut state = self.lock();

        if let Some(old) = state.entries.pop(&key) {
            state.used -= old.cost;
        }
        if cost > self.capacity {
            tracing::debug!(
                "listing for {key} rejected: cost {cost} exceeds capacity {}",
                self.capacity
            );
            return false;
        }

        while state.used + cost > self.capacity {
            match state.entries.pop_lru() {
                Some((evicted, slot)) => {
                    state.used -= slot.cost;
                    tracing::debug!("evicted listing for {evicted} (cost {})", slot.cost);
                }
                None => break,
            }
        }

        state.used += cost;
        state.entries.put(key, Slot { entry, cost });
        true
    }

    /// Removes the entry under `key`, returning it if present.
    pub fn remove(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        let mut state = self.lock();
        let slot = state.entries.pop(key)?;
        state.used -= slot.cost;
        Some(slot.entry)
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.used = 0;
    }

    #[cfg(test)]
    fn contains(&self, key: &CacheKey) -> bool {
        self.lock().entries.contains(key)
    }

    /// Number of cached listings.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Aggregate cost of everything currently stored.
    pub fn used(&self) -> u64 {
        self.lock().used
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}
