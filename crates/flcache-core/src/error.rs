//! Error types for `flcache-core`.
//!
//! Fallible operations inside the library return [`CacheResult<T>`], an alias
//! for `Result<T, CacheError>`. The [`CacheController`](crate::CacheController)
//! never hands these to its callers; they stop at the cache boundary.

use std::path::PathBuf;

/// Unified error type for cache and enumeration operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A directory was expected but the path points to a file.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// A cache record could not be encoded.
    #[error("serialize error: {0}")]
    Serialize(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `flcache-core`.
pub type CacheResult<T> = Result<T, CacheError>;

impl CacheError {
    /// Maps an I/O error on `path` to the most specific variant.
    pub(crate) fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CacheError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                CacheError::PermissionDenied(path.to_path_buf())
            }
            _ => CacheError::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn not_found_displays_path() {
        let err = CacheError::NotFound(PathBuf::from("/missing/dir"));
        assert_eq!(err.to_string(), "path not found: /missing/dir");
    }

    #[test]
    fn not_a_directory_displays_path() {
        let err = CacheError::NotADirectory(PathBuf::from("/some/file.txt"));
        assert_eq!(err.to_string(), "not a directory: /some/file.txt");
    }

    #[test]
    fn config_parse_displays_message() {
        let err = CacheError::ConfigParse("unexpected token".to_string());
        assert_eq!(err.to_string(), "config parse error: unexpected token");
    }

    #[test]
    fn serialize_displays_message() {
        let err = CacheError::Serialize("key must be a string".to_string());
        assert_eq!(err.to_string(), "serialize error: key must be a string");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: CacheError = io_err.into();
        assert!(matches!(err, CacheError::Io(_)));
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn from_io_picks_specific_variant() {
        let path = Path::new("/locked");
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        assert!(matches!(
            CacheError::from_io(denied, path),
            CacheError::PermissionDenied(p) if p == path
        ));

        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no");
        assert!(matches!(
            CacheError::from_io(missing, path),
            CacheError::NotFound(_)
        ));

        let other = std::io::Error::new(std::io::ErrorKind::Interrupted, "no");
        assert!(matches!(CacheError::from_io(other, path), CacheError::Io(_)));
    }
}
