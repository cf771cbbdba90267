//! flcache core library - a two-tier cache of directory listings.
//!
//! A file manager asks the cache for a folder's last known listing so it can
//! paint immediately, while a fresh enumeration runs; when the enumeration
//! finishes it saves the new snapshot back.
//!
//! # Modules
//!
//! - [`model`] - Listing snapshots ([`CacheEntry`], [`FileItem`], [`FolderInfo`]) and keys ([`CacheKey`]).
//! - [`tier`] - The bounded, cost-weighted in-memory tier ([`MemoryTier`]).
//! - [`store`] - Durable storage behind the [`PersistentStore`] trait.
//! - [`persist`] - Fire-and-forget dispatch of store writes ([`PersistWriter`]).
//! - [`controller`] - The coordinator of both tiers ([`CacheController`]).
//! - [`scan`] - Directory enumeration producing cache entries.
//! - [`config`] - TOML configuration ([`Config`]).
//! - [`error`] - Unified error type ([`CacheError`]) and result alias ([`CacheResult`]).

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod persist;
pub mod scan;
pub mod store;
pub mod tier;

pub use config::{CacheSettings, Config, LogConfig};
pub use controller::{CacheController, CacheStats};
pub use error::{CacheError, CacheResult};
pub use model::{format_size, CacheEntry, CacheKey, FileItem, FolderInfo};
pub use persist::{PersistJob, PersistWriter, WriteMode};
pub use scan::{refresh, scan_directory};
pub use store::{JsonFileStore, MemoryStore, PersistentStore};
pub use tier::{MemoryTier, DEFAULT_MEMORY_CAPACITY};
