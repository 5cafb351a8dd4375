//! "My ads" route handlers.
//!
//! Publishing, editing and deleting go to the catalog first; the local
//! listing store is only touched once the catalog accepted the change.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::{info, instrument};

use buycom_core::ListingId;

use crate::catalog::UpdateMethod;
use crate::error::Result;
use crate::listings::{
    ListingDraft, ListingError, MyListingRecord, RecordIdentity, add_listing, sorted_newest_first,
};
use crate::state::AppState;

/// Stored listings, newest first.
///
/// GET /api/myads
///
/// # Errors
///
/// Returns `AppError::Listing` if the listing store cannot be read.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<MyListingRecord>>> {
    let records = state.listings().get_all()?;
    Ok(Json(sorted_newest_first(records)))
}

/// Publish a listing to the catalog and keep a local copy.
///
/// POST /api/myads
///
/// The saved draft is discarded once the listing is stored.
///
/// # Errors
///
/// Returns `AppError::Draft` for an incomplete form, `AppError::Catalog` if
/// the catalog rejects it, or `AppError::Listing` if it cannot be stored.
#[instrument(skip(state, draft), fields(title = %draft.title))]
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<ListingDraft>,
) -> Result<(StatusCode, Json<MyListingRecord>)> {
    draft.validate()?;

    let response = state.catalog().create_product(&draft.to_payload()).await?;
    let mut record = draft.into_record(&response, RecordIdentity::published(&response));
    record.id = add_listing(state.listings(), record.clone(), false)?;

    state.drafts().discard()?;
    info!(id = %record.id, remote_id = %response.id, "Listing published");

    Ok((StatusCode::CREATED, Json(record)))
}

/// One stored listing.
///
/// GET /api/myads/{id}
///
/// # Errors
///
/// Returns `AppError::Listing` with a 404 status if the listing does not exist.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
) -> Result<Json<MyListingRecord>> {
    let record = state.listings().get(id)?.ok_or(ListingError::NotFound(id))?;
    Ok(Json(record))
}

/// Update a listing in the catalog and replace the local copy.
///
/// PUT /api/myads/{id}
///
/// # Errors
///
/// Returns `AppError::Listing` with a 404 status if the listing does not
/// exist, `AppError::Draft` for an incomplete form, or `AppError::Catalog` if
/// the catalog rejects the update.
#[instrument(skip(state, draft))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
    Json(draft): Json<ListingDraft>,
) -> Result<Json<MyListingRecord>> {
    let existing = state.listings().get(id)?.ok_or(ListingError::NotFound(id))?;
    draft.validate()?;

    let response = state
        .catalog()
        .update_product(existing.catalog_id(), &draft.to_payload(), UpdateMethod::Patch)
        .await?;
    let record = draft.into_record(&response, RecordIdentity::existing(&existing));
    add_listing(state.listings(), record.clone(), true)?;

    info!(%id, "Listing updated");
    Ok(Json(record))
}

/// Delete a listing from the catalog and the local store.
///
/// DELETE /api/myads/{id}
///
/// # Errors
///
/// Returns `AppError::Listing` with a 404 status if the listing does not
/// exist, or `AppError::Catalog` if the catalog rejects the delete.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
) -> Result<StatusCode> {
    let existing = state.listings().get(id)?.ok_or(ListingError::NotFound(id))?;

    state.catalog().delete_product(existing.catalog_id()).await?;
    state.listings().delete(id)?;

    info!(%id, "Listing deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Saved "add product" form.
///
/// GET /api/myads/draft
#[instrument(skip(state))]
pub async fn show_draft(State(state): State<AppState>) -> Json<ListingDraft> {
    Json(state.drafts().load())
}

/// Save the "add product" form.
///
/// PUT /api/myads/draft
///
/// # Errors
///
/// Returns `AppError::Storage` if the draft cannot be written.
#[instrument(skip(state, draft))]
pub async fn save_draft(
    State(state): State<AppState>,
    Json(draft): Json<ListingDraft>,
) -> Result<Json<ListingDraft>> {
    state.drafts().save(&draft)?;
    Ok(Json(draft))
}

/// Discard the saved form.
///
/// DELETE /api/myads/draft
///
/// # Errors
///
/// Returns `AppError::Storage` if the draft cannot be removed.
#[instrument(skip(state))]
pub async fn discard_draft(State(state): State<AppState>) -> Result<StatusCode> {
    state.drafts().discard()?;
    Ok(StatusCode::NO_CONTENT)
}
