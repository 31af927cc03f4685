//! File-backed key-value store.
//!
//! Holds small string values (search history, theme preference) in a single
//! JSON object file inside the data directory. Writes go to a temp file in
//! the same directory and are renamed into place, so an interrupted write
//! never leaves a truncated store behind.

use crate::config;
use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Persistent string-to-string map stored as `storage.json`.
pub struct KeyValueStore {
    /// Directory holding the store file.
    pub data_dir: PathBuf,
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl KeyValueStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    ///
    /// If `data_dir` is `None`, uses the platform-appropriate default data directory.
    /// A missing store file is an empty store. A corrupt one is logged,
    /// removed and treated as empty.
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(config::default_data_dir);
        fs::create_dir_all(&dir)?;
        let path = dir.join(config::STORE_FILE);
        let entries = load_entries(&path)?;
        Ok(Self {
            data_dir: dir,
            path,
            entries,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or replace a value and persist the store.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.entries.insert(key.to_string(), value.into());
        self.persist()
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.persist()?;
        }
        Ok(existed)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Remove every key and delete the backing file.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self) -> Result<()> {
        let body = serde_json::to_vec_pretty(&self.entries)?;
        let mut tmp = NamedTempFile::new_in(&self.data_dir)?;
        tmp.write_all(&body)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), keys = self.entries.len(), "store saved");
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<BTreeMap<String, String>> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_str(&contents) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt store file, removing");
            let _ = fs::remove_file(path);
            Ok(BTreeMap::new())
        }
    }
}
