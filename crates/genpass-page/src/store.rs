//! Durable settings storage.
//!
//! `FileStore` keeps the page's key-value settings in a small JSON object on
//! disk, standing in for the browser's `localStorage`. Every write rewrites
//! the whole file through a sibling temp file and a rename, so a crash never
//! leaves a half-written store behind.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use genpass_core::{KeyValueStore, StoreError};

/// JSON-file backed key-value store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the file exists but can't be read
    /// - [`StoreError::Corrupt`] if it isn't a JSON object of strings
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| StoreError::Corrupt { reason: e.to_string() })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened settings store");
        Ok(Self { path, entries })
    }

    /// An empty store that will be written to `path`, replacing whatever is
    /// there on the first write.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), entries: BTreeMap::new() }
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StoreError::Corrupt { reason: e.to_string() })?;

        let temp = self.path.with_extension("tmp");
        fs::write(&temp, text)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    /// The value stays readable from this handle even if writing the file
    /// fails.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
