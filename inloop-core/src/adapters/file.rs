//! Filesystem key-value store
//!
//! One JSON file per key inside a directory. Writes land in a temp file in the
//! same directory and are renamed over the record, so a reader never sees a
//! half-written record. Writers from different processes serialize on an
//! advisory lock file.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

const RECORD_EXTENSION: &str = "json";
const LOCK_FILE: &str = ".lock";

/// Directory-backed storage
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys become file names, so only a safe alphabet is allowed
    fn record_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::validation(format!("invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.{}", key, RECORD_EXTENSION)))
    }

    fn with_write_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;
        FileExt::lock_exclusive(&lock_file)?;

        let result = f();

        if let Err(e) = FileExt::unlock(&lock_file) {
            tracing::warn!("failed to release storage lock: {}", e);
        }
        result
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(key)?;
        self.with_write_lock(|| {
            let mut tmp = NamedTempFile::new_in(&self.dir)?;
            tmp.write_all(value.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| Error::Io(e.error))?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.record_path(key)?;
        self.with_write_lock(|| match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with('.') {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}
