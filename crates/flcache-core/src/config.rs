//! Cache configuration loaded from a TOML file.
//!
//! Every field has a default, so the file is optional. Shape:
//!
//! ```toml
//! [cache]
//! enabled = true
//! memory_capacity = 1000000
//! store_dir = "/home/me/.config/flcache/listings"
//! background_writes = true
//! promote_on_read = false
//!
//! [log]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};
use crate::tier::DEFAULT_MEMORY_CAPACITY;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CacheError::NotFound`] if the file does not exist.
    /// - [`CacheError::PermissionDenied`] if the file is not readable.
    /// - [`CacheError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CacheResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CacheError::from_io(e, path))?;
        toml::from_str(&content).map_err(|e| CacheError::ConfigParse(e.to_string()))
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    ///
    /// Only a missing file falls back; a malformed one is still an error.
    pub fn load_or_default(path: &Path) -> CacheResult<Self> {
        match Self::load(path) {
            Err(CacheError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }
}

/// Settings of the listing cache itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Feature toggle. When off, reads miss and saves do nothing.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Memory tier capacity in cost units (listing items).
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: u64,
    /// Directory of the persistent store. Defaults to [`default_store_dir`].
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
    /// Queue persistent writes to a background writer instead of writing inline.
    #[serde(default = "default_true")]
    pub background_writes: bool,
    /// Install persistent-tier hits into the memory tier on read.
    #[serde(default)]
    pub promote_on_read: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            memory_capacity: default_memory_capacity(),
            store_dir: None,
            background_writes: true,
            promote_on_read: false,
        }
    }
}

impl CacheSettings {
    /// The configured store directory, or the per-user default.
    pub fn resolved_store_dir(&self) -> Option<PathBuf> {
        self.store_dir.clone().or_else(default_store_dir)
    }
}

/// Logging preferences for front ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// `$HOME/.config/flcache` (or `%USERPROFILE%\.config\flcache`).
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".config").join("flcache"))
}

/// Default location of the configuration file.
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Default directory of the persistent listing store.
pub fn default_store_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("listings"))
}

fn default_true() -> bool {
    true
}

fn default_memory_capacity() -> u64 {
    DEFAULT_MEMORY_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}
