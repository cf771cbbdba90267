//! Directory listing snapshot types.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::size::{format_size, type_name_for};

/// Descriptor of the directory a [`CacheEntry`] lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderInfo {
    path: PathBuf,
    name: String,
    #[serde(default)]
    modified: Option<SystemTime>,
}

impl FolderInfo {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            modified: None,
        }
    }

    /// Returns a copy carrying the directory's last-modified time.
    #[must_use]
    pub fn with_modified(self, modified: Option<SystemTime>) -> Self {
        Self { modified, ..self }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }
}

/// One file or folder row of a cached listing.
///
/// Items are built once by the enumeration producer and never changed
/// afterwards; the `with_*` methods consume `self` and return a new value.
/// Folders always report a size of `0` and an empty size string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    is_folder: bool,
    name: String,
    path: PathBuf,
    size_text: String,
    size_bytes: u64,
    type_name: String,
    #[serde(default)]
    original_path: Option<PathBuf>,
    #[serde(default)]
    deleted_at: Option<SystemTime>,
}

impl FileItem {
    /// Creates a regular file item. The size string and type are derived.
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        let name = name.into();
        let type_name = type_name_for(&name, false);
        Self {
            is_folder: false,
            name,
            path: path.into(),
            size_text: format_size(size_bytes),
            size_bytes,
            type_name,
            original_path: None,
            deleted_at: None,
        }
    }

    /// Creates a folder item.
    pub fn folder(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let type_name = type_name_for(&name, true);
        Self {
            is_folder: true,
            name,
            path: path.into(),
            size_text: String::new(),
            size_bytes: 0,
            type_name,
            original_path: None,
            deleted_at: None,
        }
    }

    /// Replaces the derived type string with one supplied by the producer.
    #[must_use]
    pub fn with_type_name(self, type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..self
        }
    }

    /// Attaches recycle-bin metadata: where the item lived and when it was deleted.
    #[must_use]
    pub fn with_recycle_info(
        self,
        original_path: impl Into<PathBuf>,
        deleted_at: Option<SystemTime>,
    ) -> Self {
        Self {
            original_path: Some(original_path.into()),
            deleted_at,
            ..self
        }
    }

    pub fn is_folder(&self) -> bool {
        self.is_folder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Human readable size, e.g. `"1.5 KB"`. Empty for folders.
    pub fn size_text(&self) -> &str {
        &self.size_text
    }

    /// Exact size in bytes. Always `0` for folders.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Location the item was deleted from, for recycle-bin listings.
    pub fn original_path(&self) -> Option<&Path> {
        self.original_path.as_deref()
    }

    pub fn deleted_at(&self) -> Option<SystemTime> {
        self.deleted_at
    }
}

/// An immutable snapshot of one directory listing.
///
/// A refresh never edits an entry in place; it builds a new `CacheEntry`
/// that replaces the old one under the same key. The key itself is not
/// stored here, it is supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    current_folder: FolderInfo,
    file_list: Vec<FileItem>,
}

impl CacheEntry {
    pub fn new(current_folder: FolderInfo, file_list: Vec<FileItem>) -> Self {
        Self {
            current_folder,
            file_list,
        }
    }

    pub fn current_folder(&self) -> &FolderInfo {
        &self.current_folder
    }

    pub fn file_list(&self) -> &[FileItem] {
        &self.file_list
    }

    /// Number of items in the listing.
    pub fn len(&self) -> usize {
        self.file_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_list.is_empty()
    }

    /// Memory-tier accounting weight: the item count, never less than one.
    pub fn cost(&self) -> u64 {
        (self.file_list.len() as u64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn docs_entry() -> CacheEntry {
        CacheEntry::new(
            FolderInfo::new(r"C:\Docs", "Docs"),
            vec![
                FileItem::file("a.txt", r"C:\Docs\a.txt", 100),
                FileItem::folder("subdir", r"C:\Docs\subdir"),
            ],
        )
    }

    #[test]
    fn file_item_derives_size_and_type() {
        let item = FileItem::file("report.pdf", "/tmp/report.pdf", 1536);
        assert!(!item.is_folder());
        assert_eq!(item.size_bytes(), 1536);
        assert_eq!(item.size_text(), "1.5 KB");
        assert_eq!(item.type_name(), "PDF File");
        assert!(item.original_path().is_none());
        assert!(item.deleted_at().is_none());
    }

    #[test]
    fn folder_item_has_zero_size() {
        let item = FileItem::folder("src", "/repo/src");
        assert!(item.is_folder());
        assert_eq!(item.size_bytes(), 0);
        assert_eq!(item.size_text(), "");
        assert_eq!(item.type_name(), "File folder");
    }

    #[test]
    fn with_type_name_overrides_derived_type() {
        let item = FileItem::file("notes.txt", "/n/notes.txt", 3).with_type_name("Text Document");
        assert_eq!(item.type_name(), "Text Document");
        assert_eq!(item.size_bytes(), 3);
    }

    #[test]
    fn recycle_info_is_kept() {
        let deleted = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let item = FileItem::file("old.txt", r"C:\$Recycle.Bin\S-1\$R1.txt", 12)
            .with_recycle_info(r"C:\Users\me\old.txt", Some(deleted));

        assert_eq!(item.original_path(), Some(Path::new(r"C:\Users\me\old.txt")));
        assert_eq!(item.deleted_at(), Some(deleted));
        assert_eq!(item.name(), "old.txt");
    }

    #[test]
    fn cost_is_item_count() {
        assert_eq!(docs_entry().cost(), 2);
        assert_eq!(docs_entry().len(), 2);
    }

    #[test]
    fn empty_listing_still_costs_one() {
        let entry = CacheEntry::new(FolderInfo::new("/empty", "empty"), Vec::new());
        assert!(entry.is_empty());
        assert_eq!(entry.cost(), 1);
    }

    #[test]
    fn json_keeps_every_field() {
        let deleted = SystemTime::UNIX_EPOCH + Duration::new(1_600_000_000, 123_456_789);
        let entry = CacheEntry::new(
            FolderInfo::new("/bin", "Recycle Bin").with_modified(Some(deleted)),
            vec![FileItem::file("x.rs", "/bin/x.rs", 7)
                .with_type_name("Rust Source")
                .with_recycle_info("/src/x.rs", Some(deleted))],
        );

        let json = serde_json::to_string(&entry).unwrap();
        let back: CacheEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(back, entry);
        assert_eq!(back.file_list()[0].deleted_at(), Some(deleted));
        assert_eq!(back.current_folder().modified(), Some(deleted));
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(docs_entry(), docs_entry());
        let other = CacheEntry::new(FolderInfo::new(r"C:\Docs", "Docs"), Vec::new());
        assert_ne!(docs_entry(), other);
    }
}
