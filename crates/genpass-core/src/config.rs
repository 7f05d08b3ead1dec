//! Last-used form settings.
//!
//! Only the length and the case survive a session. They are written after a
//! successful derivation and never on partial input, so a half-typed length
//! can't replace a good stored default.

use std::collections::HashMap;

use thiserror::Error;

use crate::validator::{DEFAULT_LENGTH, PasswordCase, validate_length};

/// Storage key holding the password length (decimal string).
pub const LENGTH_KEY: &str = "Len";

/// Storage key holding the password case name.
pub const CASE_KEY: &str = "Case";

/// Errors from key-value storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing storage is unavailable (disabled, quota, private mode).
    #[error("storage unavailable: {reason}")]
    Unavailable {
        /// Description of the failure.
        reason: String,
    },

    /// Backing file could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing data exists but can't be decoded.
    #[error("corrupt storage: {reason}")]
    Corrupt {
        /// Description of the corruption.
        reason: String,
    },
}

impl StoreError {
    /// Returns true if the error should abort the page.
    ///
    /// Storage is best effort: the page derives passwords without it, so no
    /// storage failure is fatal.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Unavailable { .. } | Self::Io(_) | Self::Corrupt { .. } => false,
        }
    }
}

/// Durable string key-value storage owned by the host page.
pub trait KeyValueStore {
    /// Read a key. `Ok(None)` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a key, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and for hosts without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was written yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Settings remembered between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedConfig {
    /// Password length, already validated.
    pub length: u8,
    /// Password case.
    pub case: PasswordCase,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        Self { length: DEFAULT_LENGTH, case: PasswordCase::Lowercase }
    }
}

impl PersistedConfig {
    /// Load stored settings, falling back to defaults.
    ///
    /// Never fails: read errors are logged and treated as absence. A stored
    /// length goes through the same validation as the form field, and an
    /// unknown case name falls back to lowercase.
    pub fn load<K: KeyValueStore + ?Sized>(store: &K) -> Self {
        let length = read(store, LENGTH_KEY).map_or(DEFAULT_LENGTH, |raw| validate_length(&raw));
        let case = read(store, CASE_KEY)
            .and_then(|name| PasswordCase::from_name(&name))
            .unwrap_or_default();

        Self { length, case }
    }

    /// Write both settings.
    ///
    /// Keys are written one after the other; a failure on the second key
    /// leaves the first one updated.
    pub fn save<K: KeyValueStore + ?Sized>(&self, store: &mut K) -> Result<(), StoreError> {
        store.set(LENGTH_KEY, &self.length.to_string())?;
        store.set(CASE_KEY, self.case.as_str())?;
        Ok(())
    }
}

fn read<K: KeyValueStore + ?Sized>(store: &K, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read setting, using default");
            None
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable { reason: "private mode".to_string() })
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable { reason: "private mode".to_string() })
        }
    }

    #[test]
    fn empty_store_loads_defaults() {
        let config = PersistedConfig::load(&MemoryStore::new());
        assert_eq!(config, PersistedConfig { length: 8, case: PasswordCase::Lowercase });
    }

    #[test]
    fn read_errors_load_defaults() {
        assert_eq!(PersistedConfig::load(&BrokenStore), PersistedConfig::default());
    }

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::new();
        let config = PersistedConfig { length: 20, case: PasswordCase::Uppercase };
        config.save(&mut store).unwrap();

        assert_eq!(store.get(LENGTH_KEY).unwrap().as_deref(), Some("20"));
        assert_eq!(store.get(CASE_KEY).unwrap().as_deref(), Some("uppercase"));
        assert_eq!(PersistedConfig::load(&store), config);
    }

    #[test]
    fn stored_length_is_validated() {
        let mut store = MemoryStore::new();
        store.set(LENGTH_KEY, "120").unwrap();
        assert_eq!(PersistedConfig::load(&store).length, 32);

        store.set(LENGTH_KEY, "garbage").unwrap();
        assert_eq!(PersistedConfig::load(&store).length, 8);
    }

    #[test]
    fn unknown_case_falls_back() {
        let mut store = MemoryStore::new();
        store.set(CASE_KEY, "camelcase").unwrap();
        assert_eq!(PersistedConfig::load(&store).case, PasswordCase::Lowercase);
    }

    #[test]
    fn save_surfaces_write_errors() {
        let config = PersistedConfig::default();
        assert!(matches!(config.save(&mut BrokenStore), Err(StoreError::Unavailable { .. })));
    }
}
