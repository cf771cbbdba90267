//! Durable listing storage.
//!
//! [`PersistentStore`] is the seam between the controller and whatever keeps
//! listings across restarts. [`JsonFileStore`] writes one JSON record per key;
//! [`MemoryStore`] keeps records in a map and stands in for it in tests.

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::CacheResult;
use crate::model::{CacheEntry, CacheKey};

/// Key/value storage of listings that survives the process.
///
/// Implementations must be safe to call from several threads. Saves for
/// different keys may run concurrently; for the same key the last completed
/// save wins. A record that cannot be decoded is reported as `Ok(None)`,
/// never as an error.
pub trait PersistentStore: Send + Sync {
    /// Inserts or replaces the record for `key`.
    fn save(&self, key: &CacheKey, entry: &CacheEntry) -> CacheResult<()>;

    /// Returns the most recently saved entry for `key`, if any.
    fn read(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>>;

    /// Deletes the record for `key`. Missing records are not an error.
    fn remove(&self, key: &CacheKey) -> CacheResult<()>;

    /// Deletes every record.
    fn clear(&self) -> CacheResult<()>;
}
