//! Favorites route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use buycom_core::ProductSummary;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::{Action, ActionOutcome, FavoriteToggle, FavoritesState};

/// Favorites read model.
#[derive(Debug, Serialize)]
pub struct FavoritesView {
    pub items: Vec<ProductSummary>,
    pub count: usize,
}

impl From<&FavoritesState> for FavoritesView {
    fn from(favorites: &FavoritesState) -> Self {
        Self {
            items: favorites.items().to_vec(),
            count: favorites.len(),
        }
    }
}

/// Result of a toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub result: FavoriteToggle,
    pub favorites: FavoritesView,
}

/// Current favorites.
///
/// GET /api/favorites
///
/// # Errors
///
/// Returns `AppError::Dispatch` if the state container is unusable.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<FavoritesView>> {
    let snapshot = state.snapshot()?;
    Ok(Json(FavoritesView::from(&snapshot.favorites)))
}

/// Add the product if absent, remove it if present.
///
/// POST /api/favorites/toggle
///
/// # Errors
///
/// Returns `AppError::Dispatch` if the state container is unusable.
#[instrument(skip(state, product), fields(product_id = %product.id))]
pub async fn toggle(
    State(state): State<AppState>,
    Json(product): Json<ProductSummary>,
) -> Result<Json<ToggleResponse>> {
    let (outcome, snapshot) = state.dispatch(Action::ToggleFavorite(product))?;
    let ActionOutcome::Favorite(result) = outcome else {
        return Err(AppError::Dispatch(format!("toggle produced {outcome:?}")));
    };

    Ok(Json(ToggleResponse {
        result,
        favorites: FavoritesView::from(&snapshot.favorites),
    }))
}

/// Remove every favorite.
///
/// DELETE /api/favorites
///
/// # Errors
///
/// Returns `AppError::Dispatch` if the state container is unusable.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<FavoritesView>> {
    let (_, snapshot) = state.dispatch(Action::ClearFavorites)?;
    Ok(Json(FavoritesView::from(&snapshot.favorites)))
}
