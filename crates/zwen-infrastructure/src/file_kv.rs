//! File-backed key-value store with atomic writes.
//!
//! Every key lives in a single JSON object file. Writes take an exclusive
//! lock, rewrite the whole file to a temporary sibling, fsync it and rename
//! it over the original.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use zwen_core::error::PersistenceError;
use zwen_core::storage::{KeyValueStore, entries_size};

/// File name used inside a data directory.
pub const STORAGE_FILE_NAME: &str = "storage.json";

type Entries = BTreeMap<String, String>;

/// A `KeyValueStore` persisted as one JSON file.
///
/// Provides:
/// - **Atomicity**: updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: a lock file serializes writers across processes
/// - **Durability**: explicit fsync before rename
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileKeyValueStore {
    /// Creates a handle for the JSON file at `path`. The file is created on
    /// first write.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            quota_bytes: None,
        }
    }

    /// Creates a handle for `storage.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORAGE_FILE_NAME))
    }

    /// Rejects writes that would make the stored entries exceed `quota_bytes`.
    pub fn with_quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every entry.
    ///
    /// A missing or empty file holds no entries.
    fn load(&self) -> Result<Entries, PersistenceError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            PersistenceError::corrupt(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Loads entries for a read-modify-write cycle.
    ///
    /// A corrupt file cannot be merged into, so it is replaced.
    fn load_for_update(&self) -> Result<Entries, PersistenceError> {
        match self.load() {
            Err(PersistenceError::Corrupt(message)) => {
                tracing::warn!(%message, "Replacing corrupt storage file");
                Ok(Entries::new())
            }
            other => other,
        }
    }

    fn save(&self, entries: &Entries) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Runs `f` on the current entries under the lock and saves the result.
    fn update<F>(&self, f: F) -> Result<(), PersistenceError>
    where
        F: FnOnce(&mut Entries) -> Result<(), PersistenceError>,
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut entries = self.load_for_update()?;
        f(&mut entries)?;
        self.save(&entries)
    }

    fn temp_path(&self) -> Result<PathBuf, PersistenceError> {
        let file_name = self.path.file_name().ok_or_else(|| {
            PersistenceError::unavailable(format!("{} has no file name", self.path.display()))
        })?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let quota = self.quota_bytes;
        self.update(|entries| {
            if let Some(limit) = quota {
                let others = entries_size(entries.iter().filter(|(k, _)| k.as_str() != key));
                let needed = others + key.len() + value.len();
                if needed > limit {
                    return Err(PersistenceError::QuotaExceeded { needed, limit });
                }
            }
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
            Ok(())
        })
    }
}

/// A file lock guard that releases the lock when dropped.
///
/// The lock file itself is never removed. Unlinking it would let two
/// writers lock different inodes at the same time.
struct FileLock {
    file: File,
}

impl FileLock {
    /// Acquires an exclusive lock next to `path`.
    fn acquire(path: &Path) -> Result<Self, PersistenceError> {
        use fs2::FileExt;

        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        FileExt::lock_exclusive(&file).map_err(|e| {
            PersistenceError::unavailable(format!("Failed to acquire storage lock: {}", e))
        })?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        use fs2::FileExt;

        let _ = FileExt::unlock(&self.file);
    }
}
