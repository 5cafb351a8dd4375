//! Mirrors favorites and cart state into durable storage.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{AppStore, CartState, FavoritesState, RootState};
use crate::storage::{KeyValueStorage, StorageError};

/// Storage key for the favorites slot.
pub const FAVORITES_KEY: &str = "favorites";

/// Storage key for the cart slot.
pub const CART_KEY: &str = "cart";

/// Loads state at startup and writes it back after every change.
///
/// Both slots are read and written independently: a corrupt or missing cart
/// never prevents favorites from loading, and the reverse. Failures in the
/// subscriber path are logged and swallowed; they never reach the code that
/// dispatched the action. [`PersistenceBridge::save`] reports them instead.
#[derive(Clone)]
pub struct PersistenceBridge {
    storage: Arc<dyn KeyValueStorage>,
}

impl std::fmt::Debug for PersistenceBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceBridge").finish_non_exhaustive()
    }
}

impl PersistenceBridge {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read both slots. Missing or malformed slots come back empty.
    #[must_use]
    pub fn load(&self) -> RootState {
        RootState {
            favorites: self.load_slot(FAVORITES_KEY, FavoritesState::normalize),
            cart: self.load_slot(CART_KEY, CartState::normalize),
        }
    }

    /// Write the entire current value of both slots, logging failures.
    pub fn persist(&self, state: &RootState) {
        for (key, result) in [
            (FAVORITES_KEY, self.save_slot(FAVORITES_KEY, &state.favorites)),
            (CART_KEY, self.save_slot(CART_KEY, &state.cart)),
        ] {
            if let Err(e) = result {
                warn!(key, error = %e, "Failed to persist state");
            }
        }
    }

    /// Write both slots, returning the first failure.
    ///
    /// Both writes are attempted even when the first one fails.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either slot cannot be written.
    pub fn save(&self, state: &RootState) -> Result<(), StorageError> {
        let favorites = self.save_slot(FAVORITES_KEY, &state.favorites);
        let cart = self.save_slot(CART_KEY, &state.cart);
        favorites.and(cart)
    }

    /// Register this bridge as a subscriber of `store`.
    pub fn attach(&self, store: &mut AppStore) {
        let bridge = self.clone();
        store.subscribe(Box::new(move |state: &RootState| bridge.persist(state)));
    }

    /// Build a store seeded from storage with this bridge attached.
    #[must_use]
    pub fn restore(&self) -> AppStore {
        let mut store = AppStore::new(self.load());
        self.attach(&mut store);
        store
    }

    /// Read one slot, then let `normalize` repair entries that break the
    /// slot's invariants.
    fn load_slot<T: DeserializeOwned + Default>(
        &self,
        key: &str,
        normalize: fn(&mut T) -> usize,
    ) -> T {
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!(key, error = %e, "Failed to read persisted state");
                return T::default();
            }
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(mut value) => {
                let repaired = normalize(&mut value);
                if repaired > 0 {
                    warn!(key, repaired, "Repaired invalid entries in persisted state");
                } else {
                    debug!(key, "Restored persisted state");
                }
                value
            }
            Err(e) => {
                warn!(key, error = %e, "Ignoring malformed persisted state");
                T::default()
            }
        }
    }

    fn save_slot<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.storage.set_item(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};
    use crate::store::Action;
    use crate::store::test_support::summary;

    use buycom_core::ProductId;

    /// Reads like an empty storage, refuses every write.
    struct FullStorage;

    impl KeyValueStorage for FullStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set_item(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded(key.to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn populated_state() -> RootState {
        let mut store = AppStore::default();
        store.dispatch(Action::ToggleFavorite(summary(1, "$79.99")));
        store.dispatch(Action::ToggleFavorite(summary(2, "$5.00")));
        store.dispatch(Action::AddToCart {
            product: summary(3, "$10.00"),
            quantity: 2,
        });
        store.state().clone()
    }

    #[test]
    fn test_round_trip_is_structurally_equal() {
        let storage = Arc::new(MemoryStorage::new());
        let bridge = PersistenceBridge::new(storage);
        let state = populated_state();

        bridge.persist(&state);

        assert_eq!(bridge.load(), state);
    }

    #[test]
    fn test_slot_shape_is_items_object() {
        let storage = Arc::new(MemoryStorage::new());
        let bridge = PersistenceBridge::new(storage.clone());
        bridge.persist(&populated_state());

        let raw = storage.get_item(CART_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["items"][0]["quantity"], 2);

        let raw = storage.get_item(FAVORITES_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_slots_load_empty() {
        let bridge = PersistenceBridge::new(Arc::new(MemoryStorage::new()));
        assert_eq!(bridge.load(), RootState::default());
    }

    #[test]
    fn test_corrupt_cart_does_not_block_favorites() {
        let storage = Arc::new(MemoryStorage::new());
        let bridge = PersistenceBridge::new(storage.clone());
        let state = populated_state();
        bridge.persist(&state);
        storage.set_item(CART_KEY, "{not json").unwrap();

        let loaded = bridge.load();

        assert!(loaded.cart.is_empty());
        assert_eq!(loaded.favorites, state.favorites);
    }

    #[test]
    fn test_invalid_cart_entries_are_repaired_on_load() {
        let storage = Arc::new(MemoryStorage::new());
        let bridge = PersistenceBridge::new(storage.clone());
        let entry = |quantity: u32| {
            let mut json = serde_json::to_value(summary(7, "$2.00")).unwrap();
            json["quantity"] = quantity.into();
            json
        };
        let slot = serde_json::json!({ "items": [entry(0), entry(3)] });
        storage.set_item(CART_KEY, &slot.to_string()).unwrap();

        let loaded = bridge.load();

        assert_eq!(loaded.cart.len(), 1);
        assert_eq!(loaded.cart.get(ProductId::new(7)).unwrap().quantity, 4);
    }

    #[test]
    fn test_repeated_favorites_are_dropped_on_load() {
        let storage = Arc::new(MemoryStorage::new());
        let bridge = PersistenceBridge::new(storage.clone());
        let slot = serde_json::json!({ "items": [summary(1, "$1.00"), summary(1, "$1.00")] });
        storage.set_item(FAVORITES_KEY, &slot.to_string()).unwrap();

        assert_eq!(bridge.load().favorites.len(), 1);
    }

    #[test]
    fn test_save_reports_write_failures() {
        let bridge = PersistenceBridge::new(Arc::new(FullStorage));
        let result = bridge.save(&populated_state());
        assert!(matches!(result, Err(StorageError::QuotaExceeded(key)) if key == FAVORITES_KEY));
    }

    #[test]
    fn test_corrupt_favorites_does_not_block_cart() {
        let storage = Arc::new(MemoryStorage::new());
        let bridge = PersistenceBridge::new(storage.clone());
        let state = populated_state();
        bridge.persist(&state);
        storage.set_item(FAVORITES_KEY, r#"{"items": 7}"#).unwrap();

        let loaded = bridge.load();

        assert!(loaded.favorites.is_empty());
        assert_eq!(loaded.cart, state.cart);
    }

    #[test]
    fn test_restored_store_persists_every_dispatch() {
        let storage = Arc::new(MemoryStorage::new());
        let bridge = PersistenceBridge::new(storage.clone());

        let mut store = bridge.restore();
        store.dispatch(Action::AddToCart {
            product: summary(1, "$2.00"),
            quantity: 1,
        });
        store.dispatch(Action::UpdateQuantity {
            id: ProductId::new(1),
            quantity: 4,
        });

        let reopened = PersistenceBridge::new(storage).restore();
        assert_eq!(
            reopened.state().cart.get(ProductId::new(1)).unwrap().quantity,
            4
        );
    }

    #[test]
    fn test_write_failures_never_reach_dispatch() {
        let bridge = PersistenceBridge::new(Arc::new(FullStorage));
        let mut store = bridge.restore();

        store.dispatch(Action::ToggleFavorite(summary(1, "$1.00")));

        assert_eq!(store.state().favorites.len(), 1);
    }
}
