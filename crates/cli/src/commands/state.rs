//! Favorites and cart commands.
//!
//! # Usage
//!
//! ```bash
//! buycom-cli state show
//! buycom-cli state clear            # both
//! buycom-cli state clear --cart
//! buycom-cli state clear --favorites
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use buycom_core::{CurrencyCode, Price};
use buycom_storefront::storage::{KeyValueStorage, StorageError};
use buycom_storefront::store::{Action, AppStore, PersistenceBridge, RootState};

/// Human-readable summary of favorites and cart.
#[must_use]
pub fn render(state: &RootState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Favorites ({})", state.favorites.len());
    for product in state.favorites.items() {
        let _ = writeln!(out, "  #{:<6} {:<40} {}", product.id, product.name, product.price);
    }

    let _ = writeln!(
        out,
        "Cart ({} entries, {} items)",
        state.cart.len(),
        state.cart.item_count()
    );
    for entry in state.cart.items() {
        let _ = writeln!(
            out,
            "  #{:<6} {:<40} {} x {}",
            entry.product.id, entry.product.name, entry.quantity, entry.product.price
        );
    }

    let subtotal = Price::new(state.cart.subtotal(), CurrencyCode::default());
    let _ = writeln!(out, "Subtotal: {subtotal}");
    out
}

/// Print favorites and cart.
pub fn show(storage: Arc<dyn KeyValueStorage>) {
    let state = PersistenceBridge::new(storage).load();

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&state));
    }
}

/// Clear the selected slots with the storefront's reducer, then write both
/// slots back.
///
/// # Errors
///
/// Returns `StorageError` if either slot cannot be written.
pub fn clear(
    storage: Arc<dyn KeyValueStorage>,
    cart: bool,
    favorites: bool,
) -> Result<(), StorageError> {
    let bridge = PersistenceBridge::new(storage);
    let mut store = AppStore::new(bridge.load());

    if favorites {
        store.dispatch(Action::ClearFavorites);
    }
    if cart {
        store.dispatch(Action::ClearCart);
    }
    bridge.save(store.state())?;

    if favorites {
        tracing::info!("Favorites cleared");
    }
    if cart {
        tracing::info!("Cart cleared");
    }
    Ok(())
}
