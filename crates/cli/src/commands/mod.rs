//! Command implementations.
//!
//! Each command takes the storage backend so tests can run against
//! `MemoryStorage`.

pub mod draft;
pub mod listings;
pub mod state;

use buycom_storefront::listings::ListingError;
use buycom_storefront::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Data directory could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Listing store failed or the listing does not exist.
    #[error(transparent)]
    Listing(#[from] ListingError),
}
