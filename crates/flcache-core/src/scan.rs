//! Directory enumeration: turns a directory on disk into a [`CacheEntry`].

use std::cmp::Ordering;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::controller::CacheController;
use crate::error::{CacheError, CacheResult};
use crate::model::{CacheEntry, CacheKey, FileItem, FolderInfo};

/// Reads the immediate contents of `path` into a listing snapshot.
///
/// Folders come first, then files, each group ordered by case-insensitive
/// name. Names are normalised to NFC. Children whose metadata cannot be read
/// are skipped.
///
/// # Errors
///
/// - [`CacheError::NotFound`] - the path does not exist.
/// - [`CacheError::NotADirectory`] - the path is not a directory.
/// - [`CacheError::PermissionDenied`] - read access is denied.
/// - [`CacheError::Io`] - any other I/O error.
pub fn scan_directory(path: &Path) -> CacheResult<CacheEntry> {
    let metadata = std::fs::metadata(path).map_err(|e| CacheError::from_io(e, path))?;
    if !metadata.is_dir() {
        return Err(CacheError::NotADirectory(path.to_path_buf()));
    }

    let read_dir = std::fs::read_dir(path).map_err(|e| CacheError::from_io(e, path))?;

    let mut items = Vec::new();
    for dir_entry in read_dir {
        let Ok(dir_entry) = dir_entry else { continue };
        let Ok(meta) = dir_entry.metadata() else {
            continue;
        };
        let name: String = dir_entry.file_name().to_string_lossy().nfc().collect();
        let item = if meta.is_dir() {
            FileItem::folder(name, dir_entry.path())
        } else {
            FileItem::file(name, dir_entry.path(), meta.len())
        };
        items.push(item);
    }
    items.sort_by(compare_items);

    let folder = FolderInfo::new(path, display_name(path)).with_modified(metadata.modified().ok());
    Ok(CacheEntry::new(folder, items))
}

/// Scans `path` and stores the result through `cache`.
///
/// Relative paths are resolved against the current directory first, so the
/// key and the folder descriptor always carry the absolute path. Returns the
/// fresh listing so the caller can display it. Scan errors are returned; the
/// cache itself never fails.
pub fn refresh(cache: &CacheController, path: &Path) -> CacheResult<CacheEntry> {
    let path = std::path::absolute(path).map_err(|e| CacheError::from_io(e, path))?;
    let entry = scan_directory(&path)?;
    cache.save_file_list_to_cache(&CacheKey::from_path(&path), entry.clone());
    Ok(entry)
}

fn compare_items(a: &FileItem, b: &FileItem) -> Ordering {
    b.is_folder()
        .cmp(&a.is_folder())
        .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .then_with(|| a.name().cmp(b.name()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().nfc().collect())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
