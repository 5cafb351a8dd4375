//! "My ads" listing commands.
//!
//! Only the local store is touched; listings published to the catalog stay
//! there.
//!
//! # Usage
//!
//! ```bash
//! buycom-cli listings list
//! buycom-cli listings delete <ID>
//! buycom-cli listings clear
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use buycom_core::ListingId;
use buycom_storefront::listings::{
    ListingError, ListingStore, MyListingRecord, StorageListingStore, sorted_newest_first,
};
use buycom_storefront::storage::KeyValueStorage;

use super::CommandError;

/// One line per listing, newest first.
#[must_use]
pub fn render(records: &[MyListingRecord]) -> String {
    if records.is_empty() {
        return "No listings\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        let price = record
            .price
            .map_or_else(|| "-".to_string(), |p| format!("${p:.2}"));
        let _ = writeln!(
            out,
            "{:<18} {:<40} {:>10}  {}",
            record.id,
            record.title,
            price,
            record.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    out
}

/// Print every listing.
///
/// # Errors
///
/// Returns `CommandError` if the listing store cannot be read.
pub fn list(storage: Arc<dyn KeyValueStorage>) -> Result<(), CommandError> {
    let store = StorageListingStore::new(storage);
    let records = sorted_newest_first(store.get_all()?);

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&records));
    }
    Ok(())
}

/// Delete one listing.
///
/// # Errors
///
/// Returns `CommandError::Listing` if the listing does not exist or the store
/// cannot be written.
pub fn delete(storage: Arc<dyn KeyValueStorage>, id: ListingId) -> Result<(), CommandError> {
    let store = StorageListingStore::new(storage);
    if store.get(id)?.is_none() {
        return Err(ListingError::NotFound(id).into());
    }
    store.delete(id)?;
    tracing::info!(%id, "Listing deleted");
    Ok(())
}

/// Delete every listing.
///
/// # Errors
///
/// Returns `CommandError` if the store cannot be written.
pub fn clear(storage: Arc<dyn KeyValueStorage>) -> Result<(), CommandError> {
    StorageListingStore::new(storage).clear()?;
    tracing::info!("All listings deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use buycom_storefront::listings::add_listing;
    use buycom_storefront::storage::MemoryStorage;

    use super::*;

    fn record(id: i64, title: &str, created_at: &str) -> MyListingRecord {
        MyListingRecord {
            id: ListingId::new(id),
            title: title.to_string(),
            description: None,
            category: None,
            price: Some(12.5),
            discount_percentage: None,
            stock: None,
            thumbnail: None,
            images: Vec::new(),
            discount_type: None,
            remote_id: None,
            created_at: created_at.parse().unwrap(),
            source: None,
            raw: None,
        }
    }

    fn seeded() -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        let store = StorageListingStore::new(storage.clone());
        add_listing(&store, record(1, "Old lamp", "2024-01-01T00:00:00Z"), false).unwrap();
        add_listing(&store, record(2, "New chair", "2024-06-01T00:00:00Z"), false).unwrap();
        storage
    }

    #[test]
    fn test_render_newest_first() {
        let storage = seeded();
        let records = sorted_newest_first(StorageListingStore::new(storage).get_all().unwrap());
        let out = render(&records);

        let chair = out.find("New chair").unwrap();
        let lamp = out.find("Old lamp").unwrap();
        assert!(chair < lamp);
        assert!(out.contains("$12.50"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "No listings\n");
    }

    #[test]
    fn test_delete_missing_listing_fails() {
        let storage = seeded();
        let err = delete(storage, ListingId::new(99)).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Listing(ListingError::NotFound(id)) if id == ListingId::new(99)
        ));
    }

    #[test]
    fn test_delete_and_clear() {
        let storage = seeded();
        delete(storage.clone(), ListingId::new(1)).unwrap();

        let store = StorageListingStore::new(storage.clone());
        assert_eq!(store.get_all().unwrap().len(), 1);

        clear(storage).unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }
}
