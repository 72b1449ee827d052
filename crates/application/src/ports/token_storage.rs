//! Token persistence port

use thiserror::Error;

/// Errors surfaced by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend rejected or could not complete the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored payload could not be decoded.
    #[error("corrupted storage entry: {0}")]
    Corrupted(String),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Port for synchronous string key/value persistence.
///
/// Any operation may fail (quota, unavailability, corrupted value); the
/// manager treats every failure as "no token available" rather than
/// propagating it.
pub trait TokenStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read or the entry
    /// cannot be decoded.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the entry under `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str);
}
