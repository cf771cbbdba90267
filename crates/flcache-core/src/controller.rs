//! The two-tier listing cache coordinator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::config::{default_config_path, CacheSettings, Config};
use crate::model::{CacheEntry, CacheKey};
use crate::persist::{PersistJob, PersistWriter, WriteMode};
use crate::store::{JsonFileStore, MemoryStore, PersistentStore};
use crate::tier::MemoryTier;

static SHARED: OnceLock<Arc<CacheController>> = OnceLock::new();

/// A point-in-time view of the memory tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub enabled: bool,
    /// Listings held in memory.
    pub entries: usize,
    /// Aggregate cost of those listings.
    pub used: u64,
    pub capacity: u64,
    /// `false` once the store writer could not be started and the cache is
    /// memory-only.
    pub persisting: bool,
}

/// Coordinates the [`MemoryTier`] and a [`PersistentStore`].
///
/// Saves land in memory synchronously and are queued for the store; reads
/// try memory first and fall back to the store. The controller is an error
/// boundary: nothing it does returns an error, and any failure below it
/// shows up only as a cache miss. The enumeration producer stays the source
/// of truth.
///
/// Build one with [`CacheController::new`] and inject it, or use the
/// process-wide instance from [`CacheController::shared`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use flcache_core::{
///     CacheController, CacheEntry, CacheKey, CacheSettings, FileItem, FolderInfo, MemoryStore,
///     WriteMode,
/// };
///
/// let cache = CacheController::new(
///     &CacheSettings::default(),
///     Arc::new(MemoryStore::new()),
///     WriteMode::Inline,
/// );
/// let key = CacheKey::new("/home/me");
/// let entry = CacheEntry::new(
///     FolderInfo::new("/home/me", "me"),
///     vec![FileItem::file("notes.txt", "/home/me/notes.txt", 12)],
/// );
///
/// cache.save_file_list_to_cache(&key, entry.clone());
/// assert_eq!(cache.read_file_list_from_cache(&key).as_deref(), Some(&entry));
/// ```
pub struct CacheController {
    enabled: AtomicBool,
    promote_on_read: bool,
    memory: MemoryTier,
    store: Arc<dyn PersistentStore>,
    writer: PersistWriter,
}

impl CacheController {
    pub fn new(settings: &CacheSettings, store: Arc<dyn PersistentStore>, mode: WriteMode) -> Self {
        Self {
            enabled: AtomicBool::new(settings.enabled),
            promote_on_read: settings.promote_on_read,
            memory: MemoryTier::new(settings.memory_capacity),
            writer: PersistWriter::new(Arc::clone(&store), mode),
            store,
        }
    }

    /// Builds a controller backed by a [`JsonFileStore`] in the configured
    /// store directory. Without a usable directory the persistent tier is an
    /// in-process [`MemoryStore`].
    pub fn from_settings(settings: &CacheSettings) -> Self {
        let store: Arc<dyn PersistentStore> = match settings.resolved_store_dir() {
            Some(dir) => Arc::new(JsonFileStore::new(dir)),
            None => {
                tracing::warn!("no home directory found; listings will not survive restart");
                Arc::new(MemoryStore::new())
            }
        };
        let mode = if settings.background_writes {
            WriteMode::Background
        } else {
            WriteMode::Inline
        };
        Self::new(settings, store, mode)
    }

    /// The process-wide controller, built on first use from the default
    /// config file (or defaults when it is missing or unreadable).
    pub fn shared() -> Arc<CacheController> {
        Arc::clone(SHARED.get_or_init(|| {
            let config = match default_config_path() {
                Some(path) => Config::load_or_default(&path).unwrap_or_else(|e| {
                    tracing::warn!("using default cache settings: {e}");
                    Config::default()
                }),
                None => Config::default(),
            };
            Arc::new(Self::from_settings(&config.cache))
        }))
    }

    /// Caches a freshly enumerated listing.
    ///
    /// Installs `entry` in memory with cost equal to its item count and
    /// queues a persistent write without waiting for it. Does nothing while
    /// the cache is disabled, including when it is disabled mid-save.
    pub fn save_file_list_to_cache(&self, key: &CacheKey, entry: CacheEntry) {
        if !self.is_enabled() {
            return;
        }
        let entry = Arc::new(entry);
        let cost = entry.cost();
        self.memory.set(key.clone(), Arc::clone(&entry), cost);
        // set_enabled(false) may have cleared memory between the check and the set
        if !self.is_enabled() {
            self.memory.remove(key);
            return;
        }
        self.writer.submit(PersistJob::Save {
            key: key.clone(),
            entry,
        });
    }

    /// Returns the cached listing for `key`, or `None` when it isn't cached.
    ///
    /// A memory hit never touches the store. A store hit is returned as is;
    /// it is installed in memory only when `promote_on_read` is set, since the
    /// next save from a fresh enumeration refreshes memory anyway.
    pub fn read_file_list_from_cache(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        if !self.is_enabled() {
            return None;
        }
        if let Some(entry) = self.memory.get(key) {
            return Some(entry);
        }

        let entry = match self.store.read(key) {
            Ok(Some(entry)) => Arc::new(entry),
            Ok(None) => {
                tracing::debug!("listing cache miss for {key}");
                return None;
            }
            Err(e) => {
                tracing::warn!("persistent listing read failed for {key}: {e}");
                return None;
            }
        };
        if self.promote_on_read {
            self.memory
                .set(key.clone(), Arc::clone(&entry), entry.cost());
        }
        Some(entry)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Turns the cache on or off.
    ///
    /// Turning it off also empties the memory tier, so nothing saved before
    /// is served once it is turned back on except what the store holds.
    pub fn set_enabled(&self, enabled: bool) {
        let was = self.enabled.swap(enabled, Ordering::AcqRel);
        if was && !enabled {
            self.memory.clear();
        }
    }

    /// Drops `key` from the memory tier only. The persisted copy stays.
    pub fn evict_from_memory(&self, key: &CacheKey) {
        self.memory.remove(key);
    }

    /// Drops `key` from both tiers.
    pub fn invalidate(&self, key: &CacheKey) {
        self.memory.remove(key);
        self.writer.submit(PersistJob::Remove(key.clone()));
    }

    /// Empties both tiers. The store is cleared after writes already queued.
    pub fn clear(&self) {
        self.memory.clear();
        self.writer.submit(PersistJob::Clear);
    }

    /// Waits for queued persistent writes. See [`PersistWriter::flush`].
    ///
    /// # Panics
    ///
    /// Must not be called from within an async runtime, since it waits with a
    /// blocking receive.
    pub fn flush(&self) {
        self.writer.flush();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.is_enabled(),
            entries: self.memory.len(),
            used: self.memory.used(),
            capacity: self.memory.capacity(),
            persisting: self.writer.is_persisting(),
        }
    }
}
