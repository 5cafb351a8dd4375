//! Application state shared across handlers.

use std::sync::{Arc, Mutex};

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::listings::{DraftStore, ListingStore, StorageListingStore};
use crate::storage::KeyValueStorage;
use crate::store::{Action, ActionOutcome, AppStore, PersistenceBridge, RootState};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and owns the single favorites
/// and cart container for the process.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    // Locked only for one synchronous dispatch, never across an await.
    store: Mutex<AppStore>,
    listings: Arc<dyn ListingStore>,
    drafts: DraftStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Favorites and cart are restored from `storage` and written back to it
    /// after every dispatched action.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `storage` - Key-value storage for persisted state
    #[must_use]
    pub fn new(config: StorefrontConfig, storage: Arc<dyn KeyValueStorage>) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        let store = PersistenceBridge::new(Arc::clone(&storage)).restore();
        let listings: Arc<dyn ListingStore> =
            Arc::new(StorageListingStore::new(Arc::clone(&storage)));
        let drafts = DraftStore::new(storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                store: Mutex::new(store),
                listings,
                drafts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the listing store.
    #[must_use]
    pub fn listings(&self) -> &dyn ListingStore {
        self.inner.listings.as_ref()
    }

    /// Get a reference to the draft store.
    #[must_use]
    pub fn drafts(&self) -> &DraftStore {
        &self.inner.drafts
    }

    /// Apply an action and return its outcome with the resulting state.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Dispatch` if the container is unusable.
    pub fn dispatch(&self, action: Action) -> Result<(ActionOutcome, RootState), AppError> {
        let mut store = self
            .inner
            .store
            .lock()
            .map_err(|e| AppError::Dispatch(e.to_string()))?;
        let outcome = store.dispatch(action);
        Ok((outcome, store.state().clone()))
    }

    /// Current favorites and cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Dispatch` if the container is unusable.
    pub fn snapshot(&self) -> Result<RootState, AppError> {
        let store = self
            .inner
            .store
            .lock()
            .map_err(|e| AppError::Dispatch(e.to_string()))?;
        Ok(store.state().clone())
    }
}
