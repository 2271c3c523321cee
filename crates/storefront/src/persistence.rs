//! Local persistence for shopper state.
//!
//! Each store is saved as one JSON record under its own key, loaded once at
//! startup and rewritten after every change. The on-disk layout is:
//!
//! ```text
//! <data_dir>/
//!     cart.json       -- [{ "product": {..}, "quantity": 2 }, ..]
//!     wishlist.json   -- [{ product }, ..]
//!     session.json    -- { user } | null
//!     accounts.json   -- [{ "user": {..}, "password_hash": "$argon2id$.." }, ..]
//! ```
//!
//! Writes go to `<key>.json.tmp` first and are renamed into place, so a
//! crash mid-write leaves the previous record intact.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Record keys.
pub mod keys {
    pub const CART: &str = "cart";
    pub const WISHLIST: &str = "wishlist";
    pub const SESSION: &str = "session";
    pub const ACCOUNTS: &str = "accounts";
}

/// Errors from reading or writing a persisted record.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Record could not be encoded or decoded.
    #[error("JSON error for record '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Key contains characters that cannot be used as a file name.
    #[error("invalid record key: {0}")]
    InvalidKey(String),
}

/// A keyed JSON record store.
///
/// Object-safe so stores can share one `Arc<dyn StateStore>`; use the typed
/// [`load`](dyn StateStore::load) and [`save`](dyn StateStore::save) helpers.
pub trait StateStore: Send + Sync {
    /// Read the raw record for `key`, or `None` if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or parsed.
    fn load_value(&self, key: &str) -> Result<Option<Value>, PersistenceError>;

    /// Replace the record for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save_value(&self, key: &str, value: Value) -> Result<(), PersistenceError>;

    /// Delete the record for `key`. Missing records are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing record cannot be deleted.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

impl dyn StateStore + '_ {
    /// Load and decode the record for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read or does not match `T`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError> {
        self.load_value(key)?
            .map(|value| {
                serde_json::from_value(value).map_err(|source| PersistenceError::Json {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Encode and save `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PersistenceError> {
        let value = serde_json::to_value(value).map_err(|source| PersistenceError::Json {
            key: key.to_string(),
            source,
        })?;
        self.save_value(key, value)
    }
}

// =============================================================================
// JsonFileStore
// =============================================================================

/// One pretty-printed JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the record files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` for empty keys or keys that could escape the
    /// data directory.
    pub fn record_path(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(path: &Path, source: io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl StateStore for JsonFileStore {
    fn load_value(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        let path = self.record_path(key)?;
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        let value = serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Json {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    fn save_value(&self, key: &str, value: Value) -> Result<(), PersistenceError> {
        let path = self.record_path(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let json = serde_json::to_vec_pretty(&value).map_err(|source| PersistenceError::Json {
            key: key.to_string(),
            source,
        })?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|e| io_error(&tmp_path, e))?;
        std::fs::rename(&tmp_path, &path).map_err(|e| io_error(&path, e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.record_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// Records kept in memory only. State is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load_value(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(key).cloned())
    }

    fn save_value(&self, key: &str, value: Value) -> Result<(), PersistenceError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
