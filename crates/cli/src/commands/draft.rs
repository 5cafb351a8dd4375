//! Saved listing form commands.

use std::sync::Arc;

use buycom_storefront::listings::DraftStore;
use buycom_storefront::storage::KeyValueStorage;

use super::CommandError;

/// Discard the saved "add product" form.
///
/// # Errors
///
/// Returns `CommandError` if the draft cannot be removed.
pub fn discard(storage: Arc<dyn KeyValueStorage>) -> Result<(), CommandError> {
    DraftStore::new(storage).discard()?;
    tracing::info!("Draft discarded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use buycom_storefront::listings::ListingDraft;
    use buycom_storefront::storage::MemoryStorage;

    use super::*;

    #[test]
    fn test_discard_removes_saved_form() {
        let storage = Arc::new(MemoryStorage::new());
        let drafts = DraftStore::new(storage.clone());
        drafts
            .save(&ListingDraft {
                title: "Lamp".to_string(),
                ..ListingDraft::default()
            })
            .unwrap();

        discard(storage).unwrap();
        assert_eq!(drafts.load(), ListingDraft::default());
    }
}
