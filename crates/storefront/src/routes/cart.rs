//! Cart route handlers.
//!
//! Every mutation answers with the full cart read model. Unknown product ids
//! are not errors: removing or updating a missing entry leaves the cart as it
//! was and still returns 200.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use buycom_core::{CurrencyCode, Price, ProductId, ProductSummary};

use crate::error::Result;
use crate::state::AppState;
use crate::store::{Action, CartEntry, CartState};

/// Cart read model with derived totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartEntry>,
    pub subtotal: Decimal,
    /// Subtotal formatted for display, e.g. `$25.50`.
    pub subtotal_label: String,
    /// Total quantity across entries, for the header badge.
    pub item_count: u64,
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        let subtotal = cart.subtotal();
        Self {
            items: cart.items().to_vec(),
            subtotal,
            subtotal_label: Price::new(subtotal, CurrencyCode::default()).display(),
            item_count: cart.item_count(),
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product: ProductSummary,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Current cart.
///
/// GET /api/cart
///
/// # Errors
///
/// Returns `AppError::Dispatch` if the state container is unusable.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CartView>> {
    let snapshot = state.snapshot()?;
    Ok(Json(CartView::from(&snapshot.cart)))
}

/// Add a product, or increase its quantity if already in the cart.
///
/// POST /api/cart/items
///
/// # Errors
///
/// Returns `AppError::Dispatch` if the state container is unusable.
#[instrument(skip(state, body), fields(product_id = %body.product.id, quantity = body.quantity))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let (_, snapshot) = state.dispatch(Action::AddToCart {
        product: body.product,
        quantity: body.quantity,
    })?;
    Ok(Json(CartView::from(&snapshot.cart)))
}

/// Set an entry's quantity. Values below 1 are clamped to 1.
///
/// PATCH /api/cart/items/{id}
///
/// # Errors
///
/// Returns `AppError::Dispatch` if the state container is unusable.
#[instrument(skip(state, body), fields(quantity = body.quantity))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let (_, snapshot) = state.dispatch(Action::UpdateQuantity {
        id,
        quantity: body.quantity,
    })?;
    Ok(Json(CartView::from(&snapshot.cart)))
}

/// Remove an entry regardless of quantity.
///
/// DELETE /api/cart/items/{id}
///
/// # Errors
///
/// Returns `AppError::Dispatch` if the state container is unusable.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let (_, snapshot) = state.dispatch(Action::RemoveFromCart(id))?;
    Ok(Json(CartView::from(&snapshot.cart)))
}

/// Empty the cart.
///
/// DELETE /api/cart
///
/// # Errors
///
/// Returns `AppError::Dispatch` if the state container is unusable.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartView>> {
    let (_, snapshot) = state.dispatch(Action::ClearCart)?;
    Ok(Json(CartView::from(&snapshot.cart)))
}

/// Add one of a favorited product to the cart. The favorite is kept.
///
/// POST /api/cart/from-favorite/{id}
///
/// # Errors
///
/// Returns `AppError::Dispatch` if the state container is unusable.
#[instrument(skip(state))]
pub async fn add_from_favorite(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let snapshot = state.snapshot()?;
    let Some(product) = snapshot.favorites.get(id).cloned() else {
        debug!(%id, "Not a favorite, cart unchanged");
        return Ok(Json(CartView::from(&snapshot.cart)));
    };

    let (_, snapshot) = state.dispatch(Action::AddToCart {
        product,
        quantity: 1,
    })?;
    Ok(Json(CartView::from(&snapshot.cart)))
}
