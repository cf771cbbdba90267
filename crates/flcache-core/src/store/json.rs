//! One-JSON-file-per-directory listing store.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CacheError, CacheResult};
use crate::model::{CacheEntry, CacheKey};

use super::PersistentStore;

/// Record format version. Bump when the serialized shape changes; records
/// carrying any other version are treated as missing.
pub const RECORD_VERSION: u32 = 1;

const RECORD_EXT: &str = "json";
const TEMP_EXT: &str = "tmp";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Serialize)]
struct RecordRef<'a> {
    version: u32,
    key: &'a CacheKey,
    saved_at: u64,
    entry: &'a CacheEntry,
}

#[derive(Deserialize)]
struct Record {
    version: u32,
    key: CacheKey,
    entry: CacheEntry,
}

/// A [`PersistentStore`] keeping each listing in its own JSON file.
///
/// Files live directly under the store directory and are named after the
/// SHA-256 of the key, e.g. `3f1a…9c.json`. Each file holds
/// `{ "version", "key", "saved_at", "entry" }`.
///
/// Saves write a private temp file and rename it over the record, so readers
/// see either the previous record or the new one in full, and of two racing
/// saves the later rename wins.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record file for `key`.
    pub fn record_path(&self, key: &CacheKey) -> PathBuf {
        let digest = Sha256::digest(key.as_str().as_bytes());
        let name: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        self.dir.join(format!("{name}.{RECORD_EXT}"))
    }

    /// Number of record files currently on disk.
    pub fn record_count(&self) -> CacheResult<usize> {
        Ok(self.record_files()?.len())
    }

    fn record_files(&self) -> CacheResult<Vec<PathBuf>> {
        self.files_with_ext(&[RECORD_EXT])
    }

    /// Files directly under the store directory whose extension is in `exts`.
    fn files_with_ext(&self, exts: &[&str]) -> CacheResult<Vec<PathBuf>> {
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::from_io(e, &self.dir)),
        };
        Ok(read_dir
            .filter_map(Result::ok)
            .map(|dir_entry| dir_entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| exts.iter().any(|wanted| ext == *wanted))
            })
            .collect())
    }

    fn temp_path(&self, record: &Path) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        record.with_extension(format!("{}.{n}.{TEMP_EXT}", std::process::id()))
    }
}

impl PersistentStore for JsonFileStore {
    fn save(&self, key: &CacheKey, entry: &CacheEntry) -> CacheResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CacheError::from_io(e, &self.dir))?;

        let saved_at = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let record = RecordRef {
            version: RECORD_VERSION,
            key,
            saved_at,
            entry,
        };
        let json = serde_json::to_vec(&record).map_err(|e| CacheError::Serialize(e.to_string()))?;

        let path = self.record_path(key);
        let temp = self.temp_path(&path);
        replace_file(&temp, &path, &json)
    }

    fn read(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>> {
        let path = self.record_path(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::from_io(e, &path)),
        };

        let record: Record = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("ignoring unreadable record {}: {e}", path.display());
                return Ok(None);
            }
        };
        if record.version != RECORD_VERSION {
            tracing::debug!(
                "ignoring record {} with version {}",
                path.display(),
                record.version
            );
            return Ok(None);
        }
        if record.key != *key {
            tracing::debug!("ignoring record {} stored for {}", path.display(), record.key);
            return Ok(None);
        }
        Ok(Some(record.entry))
    }

    fn remove(&self, key: &CacheKey) -> CacheResult<()> {
        let path = self.record_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::from_io(e, &path)),
        }
    }

    /// Removes every record, plus temp files left by interrupted saves.
    fn clear(&self) -> CacheResult<()> {
        for path in self.files_with_ext(&[RECORD_EXT, TEMP_EXT])? {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::from_io(e, &path)),
            }
        }
        Ok(())
    }
}

/// Writes `bytes` to `temp` and renames it over `path`.
///
/// The temp file is removed again whenever either step fails.
fn replace_file(temp: &Path, path: &Path, bytes: &[u8]) -> CacheResult<()> {
    if let Err(e) = std::fs::write(temp, bytes) {
        let _ = std::fs::remove_file(temp);
        return Err(CacheError::from_io(e, temp));
    }
    if let Err(e) = std::fs::rename(temp, path) {
        let _ = std::fs::remove_file(temp);
        return Err(CacheError::from_io(e, path));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileItem, FolderInfo};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

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
    fn save_then_read() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        let key = CacheKey::new(r"C:\Docs");

        store.save(&key, &docs_entry()).unwrap();
        let loaded = store.read(&key).unwrap().unwrap();

        assert_eq!(loaded, docs_entry());
        assert_eq!(loaded.file_list()[0].size_bytes(), 100);
        assert!(loaded.file_list()[1].is_folder());
    }

    #[test]
    fn read_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path().join("never-created"));
        assert!(store.read(&CacheKey::new("/x")).unwrap().is_none());
    }

    #[test]
    fn save_creates_store_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("deep").join("listings");
        let store = JsonFileStore::new(&dir);

        store.save(&CacheKey::new("/x"), &docs_entry()).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.record_count().unwrap(), 1);
    }

    #[test]
    fn records_survive_a_new_store_instance() {
        let tmp = TempDir::new().unwrap();
        let key = CacheKey::new("/home/me");
        JsonFileStore::new(tmp.path())
            .save(&key, &docs_entry())
            .unwrap();

        let reopened = JsonFileStore::new(tmp.path());
        assert_eq!(reopened.read(&key).unwrap(), Some(docs_entry()));
    }

    #[test]
    fn last_save_wins() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        let key = CacheKey::new("/d");
        let newer = CacheEntry::new(FolderInfo::new("/d", "d"), Vec::new());

        store.save(&key, &docs_entry()).unwrap();
        store.save(&key, &newer).unwrap();

        assert_eq!(store.read(&key).unwrap(), Some(newer));
        assert_eq!(store.record_count().unwrap(), 1);
    }

    #[test]
    fn no_temp_files_left_behind() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        store.save(&CacheKey::new("/a"), &docs_entry()).unwrap();
        store.save(&CacheKey::new("/a"), &docs_entry()).unwrap();

        let leftovers = fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == TEMP_EXT))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn malformed_record_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        let key = CacheKey::new("/broken");
        fs::write(store.record_path(&key), "{ not json").unwrap();

        assert!(store.read(&key).unwrap().is_none());
    }

    #[test]
    fn other_version_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        let key = CacheKey::new("/old");
        store.save(&key, &docs_entry()).unwrap();

        let path = store.record_path(&key);
        let mut value: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        value["version"] = serde_json::json!(RECORD_VERSION + 1);
        fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

        assert!(store.read(&key).unwrap().is_none());
    }

    #[test]
    fn record_for_another_key_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        let a = CacheKey::new("/a");
        let b = CacheKey::new("/b");
        store.save(&a, &docs_entry()).unwrap();
        fs::copy(store.record_path(&a), store.record_path(&b)).unwrap();

        assert!(store.read(&b).unwrap().is_none());
    }

    #[test]
    fn corrupt_record_is_replaced_by_next_save() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        let key = CacheKey::new("/heal");
        fs::write(store.record_path(&key), b"\xff\x00\x13").unwrap();

        store.save(&key, &docs_entry()).unwrap();
        assert_eq!(store.read(&key).unwrap(), Some(docs_entry()));
    }

    #[test]
    fn timestamps_survive_exactly() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        let key = CacheKey::new("/recycle");
        let when = SystemTime::UNIX_EPOCH + Duration::new(1_650_000_000, 987_654_321);
        let entry = CacheEntry::new(
            FolderInfo::new("/recycle", "Recycle Bin"),
            vec![FileItem::file("gone.doc", "/recycle/$R1.doc", 42)
                .with_recycle_info("/home/me/gone.doc", Some(when))],
        );

        store.save(&key, &entry).unwrap();
        let loaded = store.read(&key).unwrap().unwrap();
        assert_eq!(loaded.file_list()[0].deleted_at(), Some(when));
        assert_eq!(
            loaded.file_list()[0].original_path(),
            Some(Path::new("/home/me/gone.doc"))
        );
    }

    #[test]
    fn remove_and_clear() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        let a = CacheKey::new("/a");
        let b = CacheKey::new("/b");
        store.save(&a, &docs_entry()).unwrap();
        store.save(&b, &docs_entry()).unwrap();

        store.remove(&a).unwrap();
        store.remove(&a).unwrap();
        assert!(store.read(&a).unwrap().is_none());
        assert!(store.read(&b).unwrap().is_some());

        store.clear().unwrap();
        assert_eq!(store.record_count().unwrap(), 0);
    }

    #[test]
    fn clear_on_missing_dir_is_ok() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path().join("absent"));
        store.clear().unwrap();
    }

    #[test]
    fn clear_removes_leftover_temp_files() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path());
        let key = CacheKey::new("/interrupted");
        store.save(&key, &docs_entry()).unwrap();
        let stale = store.record_path(&key).with_extension("999.0.tmp");
        fs::write(&stale, "{ half a rec").unwrap();

        store.clear().unwrap();

        assert!(!stale.exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn failed_replace_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        // a non-empty directory cannot be replaced by a rename
        let target = tmp.path().join("occupied.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inside"), "x").unwrap();
        let temp = tmp.path().join("occupied.1.0.tmp");

        assert!(replace_file(&temp, &target, b"{}").is_err());
        assert!(!temp.exists());

        let missing_parent = tmp.path().join("gone").join("r.1.0.tmp");
        assert!(replace_file(&missing_parent, &target, b"{}").is_err());
        assert!(!missing_parent.exists());
    }

    #[test]
    fn record_path_is_stable_per_key() {
        let store = JsonFileStore::new("/store");
        let p1 = store.record_path(&CacheKey::new(r"C:\Docs"));
        let p2 = store.record_path(&CacheKey::new(r"c:\docs\"));
        assert_eq!(p1, p2);
        assert_ne!(p1, store.record_path(&CacheKey::new(r"C:\Other")));
        assert!(p1.to_str().unwrap().ends_with(".json"));
    }
}
