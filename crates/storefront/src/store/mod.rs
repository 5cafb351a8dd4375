//! Client-side state container for favorites and the cart.
//!
//! # Architecture
//!
//! - [`AppStore`] owns a [`RootState`] with two independent collections
//! - Callers mutate state only through [`AppStore::dispatch`] with an [`Action`]
//! - The reducer runs synchronously, then every subscriber is called with the
//!   new state, in registration order
//! - [`PersistenceBridge`] is one such subscriber: it mirrors both slots into
//!   [`KeyValueStorage`](crate::storage::KeyValueStorage) after every action
//!
//! The container is built once by the application root and handed to whoever
//! needs it; there is no global instance.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use buycom_core::{ProductId, ProductSummary};
//! use buycom_storefront::storage::MemoryStorage;
//! use buycom_storefront::store::{Action, AppStore, PersistenceBridge};
//!
//! let bridge = PersistenceBridge::new(Arc::new(MemoryStorage::new()));
//! let mut store = bridge.restore();
//!
//! let product = ProductSummary {
//!     id: ProductId::new(1),
//!     name: "Essence Mascara".to_string(),
//!     price: "$9.99".to_string(),
//!     image: String::new(),
//!     category: "beauty".to_string(),
//!     rating: 4.9,
//!     amount: None,
//! };
//! store.dispatch(Action::AddToCart { product, quantity: 2 });
//! assert_eq!(store.state().cart.item_count(), 2);
//! ```

mod cart;
mod favorites;
mod persistence;

pub use cart::{CartEntry, CartState};
pub use favorites::{FavoriteToggle, FavoritesState};
pub use persistence::{CART_KEY, FAVORITES_KEY, PersistenceBridge};

use serde::{Deserialize, Serialize};
use tracing::debug;

use buycom_core::{ProductId, ProductSummary};

/// Everything the container holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootState {
    pub favorites: FavoritesState,
    pub cart: CartState,
}

/// A state transition request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleFavorite(ProductSummary),
    ClearFavorites,
    AddToCart {
        product: ProductSummary,
        quantity: u32,
    },
    RemoveFromCart(ProductId),
    UpdateQuantity {
        id: ProductId,
        quantity: i64,
    },
    ClearCart,
}

impl Action {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ToggleFavorite(_) => "toggle_favorite",
            Self::ClearFavorites => "clear_favorites",
            Self::AddToCart { .. } => "add_to_cart",
            Self::RemoveFromCart(_) => "remove_from_cart",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::ClearCart => "clear_cart",
        }
    }
}

/// What a dispatched action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A favorites toggle, with its direction.
    Favorite(FavoriteToggle),
    /// Any other action. Not-found ids land here too.
    Applied,
}

/// Apply an action to the state.
pub fn reduce(state: &mut RootState, action: Action) -> ActionOutcome {
    match action {
        Action::ToggleFavorite(product) => ActionOutcome::Favorite(state.favorites.toggle(product)),
        Action::ClearFavorites => {
            state.favorites.clear();
            ActionOutcome::Applied
        }
        Action::AddToCart { product, quantity } => {
            state.cart.add(product, quantity);
            ActionOutcome::Applied
        }
        Action::RemoveFromCart(id) => {
            state.cart.remove(id);
            ActionOutcome::Applied
        }
        Action::UpdateQuantity { id, quantity } => {
            state.cart.update_quantity(id, quantity);
            ActionOutcome::Applied
        }
        Action::ClearCart => {
            state.cart.clear();
            ActionOutcome::Applied
        }
    }
}

/// Change listener invoked after every dispatch.
pub type Subscriber = Box<dyn Fn(&RootState) + Send>;

/// Handle returned by [`AppStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// State container with synchronous change notification.
pub struct AppStore {
    state: RootState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(RootState::default())
    }
}

impl AppStore {
    /// Create a container seeded with `initial` state.
    #[must_use]
    pub const fn new(initial: RootState) -> Self {
        Self {
            state: initial,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &RootState {
        &self.state
    }

    /// Run the reducer for `action`, then notify subscribers.
    pub fn dispatch(&mut self, action: Action) -> ActionOutcome {
        let name = action.name();
        let outcome = reduce(&mut self.state, action);
        debug!(
            action = name,
            favorites = self.state.favorites.len(),
            cart = self.state.cart.len(),
            "Dispatched"
        );

        for (_, subscriber) in &self.subscribers {
            subscriber(&self.state);
        }

        outcome
    }

    /// Register a listener called after every dispatch.
    pub fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }
}
