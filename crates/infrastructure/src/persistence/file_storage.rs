//! File-based token storage.
//!
//! All entries live in a single JSON object file, keys mapped to the
//! serialized values. The file should be excluded from version control.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use credo_application::ports::{StorageError, TokenStorage};

/// File-backed token storage.
///
/// The whole store is one JSON object:
/// ```json
/// {
///   "auth-token": "{\"accessToken\":\"abc\",\"expiresAt\":null}"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Creates a storage backed by the file at `path`.
    ///
    /// The file and its parent directories are created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| StorageError::Corrupted(e.to_string()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        fs::write(&self.path, content)?;

        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut entries = self.read_entries()?;
        Ok(entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) {
        // The port treats removal as best-effort; a store that cannot be
        // read or rewritten is left as-is and the failure logged.
        match self.read_entries() {
            Ok(mut entries) => {
                if entries.remove(key).is_some() {
                    if let Err(error) = self.write_entries(&entries) {
                        tracing::warn!(%error, key, "Failed to rewrite token store after removal");
                    }
                }
            }
            Err(error) => {
                tracing::warn!(%error, key, "Failed to read token store during removal");
            }
        }
    }
}
