//! Durable string key-value storage.
//!
//! The storefront persists its client-side state the way a browser persists
//! into `localStorage`: whole JSON documents stored under short string keys.
//! [`KeyValueStorage`] is that contract; [`FileStorage`] backs it with one
//! file per key in the data directory and [`MemoryStorage`] keeps everything
//! in process for tests and ephemeral runs.
//!
//! # Keys
//!
//! - `favorites` - favorites slot (`{ "items": [...] }`)
//! - `cart` - cart slot (`{ "items": [...] }`)
//! - `my-listing` - locally stored "my ads" listings
//! - `buy-com-add-product-draft` - in-progress listing form

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters that cannot be mapped to a file name.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Stored value is not valid UTF-8.
    #[error("Stored value for {0} is not valid UTF-8")]
    Encoding(String),

    /// Value could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the write (e.g. quota exceeded).
    #[error("Storage full: {0}")]
    QuotaExceeded(String),
}

/// String key-value storage with `localStorage` semantics.
///
/// Implementations are synchronous: writes complete before the call returns
/// and the last write to a key wins.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Check that a key is safe to use as a file stem.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
