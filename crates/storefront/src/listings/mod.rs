//! Per-device "my ads" listing store.
//!
//! Products a user publishes through the catalog are also kept locally so the
//! "my ads" page can list, edit and delete them without querying the catalog.
//! The store is a key-value collection keyed by numeric listing id with
//! get / get-all / put / delete semantics; [`add_listing`] layers the
//! insert-or-relocate rule on top.

pub mod draft;

pub use draft::{DRAFT_KEY, DraftError, DraftStore, ListingDraft, RecordIdentity};

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use buycom_core::{ListingId, ProductId};

use crate::storage::{KeyValueStorage, StorageError};

/// Storage key holding every listing.
pub const LISTINGS_KEY: &str = "my-listing";

/// Errors that can occur when reading or writing listings.
#[derive(Debug, Error)]
pub enum ListingError {
    /// Underlying storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Stored listings could not be decoded.
    #[error("Stored listings are unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// No listing with this id.
    #[error("Listing not found: {0}")]
    NotFound(ListingId),
}

/// Where a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    /// Published through the catalog API.
    Api,
    /// Saved locally without publishing.
    Draft,
}

/// A locally stored listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyListingRecord {
    pub id: ListingId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<String>,
    /// Catalog product id this listing was published as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<ProductId>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ListingSource>,
    /// Catalog response the listing was built from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl MyListingRecord {
    /// Catalog id to use for remote updates and deletes.
    #[must_use]
    pub const fn catalog_id(&self) -> ProductId {
        match self.remote_id {
            Some(id) => id,
            None => ProductId::new(self.id.as_i64()),
        }
    }
}

/// Key-value collection of listings keyed by id.
pub trait ListingStore: Send + Sync {
    /// Insert or replace the record with the same id.
    ///
    /// # Errors
    ///
    /// Returns `ListingError` if the store cannot be read or written.
    fn put(&self, record: MyListingRecord) -> Result<(), ListingError>;

    /// Get one record.
    ///
    /// # Errors
    ///
    /// Returns `ListingError` if the store cannot be read.
    fn get(&self, id: ListingId) -> Result<Option<MyListingRecord>, ListingError>;

    /// Every record, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `ListingError` if the store cannot be read.
    fn get_all(&self) -> Result<Vec<MyListingRecord>, ListingError>;

    /// Delete one record. Deleting a missing id succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ListingError` if the store cannot be read or written.
    fn delete(&self, id: ListingId) -> Result<(), ListingError>;

    /// Delete every record.
    ///
    /// # Errors
    ///
    /// Returns `ListingError` if the store cannot be written.
    fn clear(&self) -> Result<(), ListingError>;
}

/// Listing store persisted as one JSON document in key-value storage.
pub struct StorageListingStore {
    storage: Arc<dyn KeyValueStorage>,
    // Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl std::fmt::Debug for StorageListingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageListingStore").finish_non_exhaustive()
    }
}

impl StorageListingStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            lock: Mutex::new(()),
        }
    }

    fn read(&self) -> Result<BTreeMap<ListingId, MyListingRecord>, ListingError> {
        let Some(raw) = self.storage.get_item(LISTINGS_KEY)? else {
            return Ok(BTreeMap::new());
        };
        let records: Vec<MyListingRecord> = serde_json::from_str(&raw)?;
        Ok(records.into_iter().map(|r| (r.id, r)).collect())
    }

    fn write(&self, records: &BTreeMap<ListingId, MyListingRecord>) -> Result<(), ListingError> {
        let records: Vec<&MyListingRecord> = records.values().collect();
        let json = serde_json::to_string(&records)?;
        self.storage.set_item(LISTINGS_KEY, &json)?;
        Ok(())
    }
}

impl ListingStore for StorageListingStore {
    fn put(&self, record: MyListingRecord) -> Result<(), ListingError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read()?;
        records.insert(record.id, record);
        self.write(&records)
    }

    fn get(&self, id: ListingId) -> Result<Option<MyListingRecord>, ListingError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.remove(&id))
    }

    fn get_all(&self) -> Result<Vec<MyListingRecord>, ListingError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.into_values().collect())
    }

    fn delete(&self, id: ListingId) -> Result<(), ListingError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read()?;
        if records.remove(&id).is_some() {
            self.write(&records)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), ListingError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.storage.remove_item(LISTINGS_KEY)?;
        Ok(())
    }
}

/// Generate a fresh local listing id from the clock plus a random suffix.
#[must_use]
pub fn generate_local_id() -> ListingId {
    let suffix: i64 = rand::rng().random_range(0..1000);
    ListingId::new(Utc::now().timestamp_millis() * 1000 + suffix)
}

/// Store a listing.
///
/// `remote_id` defaults to the record id. With `allow_replace` the record
/// overwrites any listing with the same id; without it, a colliding id is
/// swapped for a freshly generated local id so both listings survive.
///
/// Returns the id the record was stored under.
///
/// # Errors
///
/// Returns `ListingError` if the store cannot be read or written.
#[instrument(skip(store, record), fields(id = %record.id))]
pub fn add_listing(
    store: &dyn ListingStore,
    mut record: MyListingRecord,
    allow_replace: bool,
) -> Result<ListingId, ListingError> {
    if record.remote_id.is_none() {
        record.remote_id = Some(ProductId::new(record.id.as_i64()));
    }

    if !allow_replace && store.get(record.id)?.is_some() {
        let relocated = generate_local_id();
        debug!(from = %record.id, to = %relocated, "Listing id taken, relocating");
        record.id = relocated;
    }

    let id = record.id;
    store.put(record)?;
    Ok(id)
}

/// Order listings newest first.
#[must_use]
pub fn sorted_newest_first(mut records: Vec<MyListingRecord>) -> Vec<MyListingRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Utc};

    use super::MyListingRecord;
    use buycom_core::ListingId;

    pub fn record(id: i64, created_at: &str) -> MyListingRecord {
        MyListingRecord {
            id: ListingId::new(id),
            title: format!("Listing {id}"),
            description: Some("Hand made".to_string()),
            category: Some("furniture".to_string()),
            price: Some(25.0),
            discount_percentage: None,
            stock: Some(3),
            thumbnail: None,
            images: vec!["data:image/png;base64,AAAA".to_string()],
            discount_type: None,
            remote_id: None,
            created_at: created_at.parse::<DateTime<Utc>>().unwrap(),
            source: None,
            raw: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, StorageListingStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = StorageListingStore::new(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_put_get_delete() {
        let (_, store) = store();
        store.put(record(1, "2024-01-01T00:00:00Z")).unwrap();

        assert_eq!(store.get(ListingId::new(1)).unwrap().unwrap().title, "Listing 1");
        assert!(store.get(ListingId::new(2)).unwrap().is_none());

        store.delete(ListingId::new(1)).unwrap();
        store.delete(ListingId::new(1)).unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_put_replaces_same_id() {
        let (_, store) = store();
        store.put(record(1, "2024-01-01T00:00:00Z")).unwrap();
        let mut updated = record(1, "2024-01-01T00:00:00Z");
        updated.title = "Renamed".to_string();
        store.put(updated).unwrap();

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Renamed");
    }

    #[test]
    fn test_add_listing_defaults_remote_id() {
        let (_, store) = store();
        let id = add_listing(&store, record(7, "2024-01-01T00:00:00Z"), false).unwrap();
        let stored = store.get(id).unwrap().unwrap();
        assert_eq!(stored.remote_id, Some(ProductId::new(7)));
    }

    #[test]
    fn test_add_listing_relocates_on_collision() {
        let (_, store) = store();
        add_listing(&store, record(7, "2024-01-01T00:00:00Z"), false).unwrap();
        let second = add_listing(&store, record(7, "2024-02-01T00:00:00Z"), false).unwrap();

        assert_ne!(second, ListingId::new(7));
        assert_eq!(store.get_all().unwrap().len(), 2);
        // The relocated copy still points at the catalog product it came from.
        assert_eq!(
            store.get(second).unwrap().unwrap().remote_id,
            Some(ProductId::new(7))
        );
    }

    #[test]
    fn test_add_listing_replace_overwrites() {
        let (_, store) = store();
        add_listing(&store, record(7, "2024-01-01T00:00:00Z"), false).unwrap();
        let mut updated = record(7, "2024-01-01T00:00:00Z");
        updated.price = Some(99.0);
        let id = add_listing(&store, updated, true).unwrap();

        assert_eq!(id, ListingId::new(7));
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].price, Some(99.0));
    }

    #[test]
    fn test_sorted_newest_first() {
        let sorted = sorted_newest_first(vec![
            record(1, "2024-01-01T00:00:00Z"),
            record(2, "2024-03-01T00:00:00Z"),
            record(3, "2024-02-01T00:00:00Z"),
        ]);
        let ids: Vec<_> = sorted.iter().map(|r| r.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_corrupt_store_is_reported() {
        let (storage, store) = store();
        storage.set_item(LISTINGS_KEY, "[{").unwrap();
        assert!(matches!(store.get_all(), Err(ListingError::Corrupt(_))));
    }

    #[test]
    fn test_clear_removes_everything() {
        let (_, store) = store();
        store.put(record(1, "2024-01-01T00:00:00Z")).unwrap();
        store.put(record(2, "2024-01-01T00:00:00Z")).unwrap();
        store.clear().unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_generated_ids_are_timestamp_scaled() {
        let id = generate_local_id();
        assert!(id.as_i64() > 1_600_000_000_000_000);
    }
}
