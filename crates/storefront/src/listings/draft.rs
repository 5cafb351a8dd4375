//! In-progress "add product" form, kept across restarts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use buycom_core::{ListingId, ProductId};

use super::{ListingSource, MyListingRecord};
use crate::catalog::{MutationResponse, ProductPayload};
use crate::storage::{KeyValueStorage, StorageError};

/// Storage key for the draft form.
pub const DRAFT_KEY: &str = "buy-com-add-product-draft";

/// A draft cannot be published yet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("At least one image is required")]
    NoImages,
}

/// Form state for creating or editing a listing.
///
/// Numeric fields hold what the user typed; they are parsed leniently on
/// submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub discount: String,
    pub discount_type: String,
    pub category: String,
    /// Image URLs or data URLs, in upload order.
    pub images: Vec<String>,
    /// Index into `images` of the image used as the thumbnail.
    pub primary_image: usize,
}

/// Identity carried over when turning a draft into a stored record.
#[derive(Debug, Clone, Copy)]
pub struct RecordIdentity {
    pub id: ListingId,
    pub remote_id: ProductId,
    pub created_at: DateTime<Utc>,
}

impl RecordIdentity {
    /// Identity for a freshly published product.
    #[must_use]
    pub fn published(response: &MutationResponse) -> Self {
        Self {
            id: ListingId::new(response.id.as_i64()),
            remote_id: response.id,
            created_at: Utc::now(),
        }
    }

    /// Identity for an edit of an existing listing.
    #[must_use]
    pub const fn existing(record: &MyListingRecord) -> Self {
        Self {
            id: record.id,
            remote_id: record.catalog_id(),
            created_at: record.created_at,
        }
    }
}

/// Parse a typed number the forgiving way: blanks and garbage become zero.
fn lenient_number(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Text field to `Option`, dropping blanks.
fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl ListingDraft {
    /// Check the fields required to publish.
    ///
    /// # Errors
    ///
    /// Returns the first missing field.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingField("title"));
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::MissingField("description"));
        }
        if self.category.trim().is_empty() {
            return Err(DraftError::MissingField("category"));
        }
        if self.images.is_empty() {
            return Err(DraftError::NoImages);
        }
        Ok(())
    }

    #[must_use]
    pub fn price_value(&self) -> f64 {
        lenient_number(&self.price)
    }

    #[must_use]
    pub fn discount_value(&self) -> f64 {
        lenient_number(&self.discount)
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Stock counts are small
    pub fn stock_value(&self) -> i64 {
        lenient_number(&self.stock).trunc() as i64
    }

    /// Image chosen as thumbnail, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.get(self.primary_image).map(String::as_str)
    }

    /// Remove an image and keep the primary selection pointing at the same
    /// picture where possible.
    pub fn remove_image(&mut self, index: usize) {
        if index >= self.images.len() {
            return;
        }
        self.images.remove(index);

        self.primary_image = if self.images.is_empty() || self.primary_image == index {
            0
        } else if self.primary_image > index {
            self.primary_image - 1
        } else {
            self.primary_image.min(self.images.len() - 1)
        };
    }

    /// Catalog body for create and update.
    #[must_use]
    pub fn to_payload(&self) -> ProductPayload {
        ProductPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price_value(),
            discount_percentage: self.discount_value(),
            stock: self.stock_value(),
            category: self.category.clone(),
            discount_type: non_empty(&self.discount_type),
        }
    }

    /// Merge the catalog response over the draft into a stored record.
    ///
    /// Response fields win; the draft fills whatever the catalog did not echo.
    #[must_use]
    pub fn into_record(
        self,
        response: &MutationResponse,
        identity: RecordIdentity,
    ) -> MyListingRecord {
        let discount = self.discount_value();
        let thumbnail = self
            .primary_image()
            .map(String::from)
            .or_else(|| response.thumbnail.clone())
            .or_else(|| response.images.as_ref().and_then(|i| i.first().cloned()));
        let images = if self.images.is_empty() {
            response.images.clone().unwrap_or_default()
        } else {
            self.images.clone()
        };

        MyListingRecord {
            id: identity.id,
            title: response.title.clone().unwrap_or_else(|| self.title.clone()),
            description: response
                .description
                .clone()
                .or_else(|| Some(self.description.clone())),
            category: response
                .category
                .clone()
                .or_else(|| Some(self.category.clone())),
            price: Some(response.price.unwrap_or_else(|| self.price_value())),
            discount_percentage: Some(discount),
            stock: Some(response.stock.unwrap_or_else(|| self.stock_value())),
            thumbnail,
            images,
            discount_type: non_empty(&self.discount_type),
            remote_id: Some(identity.remote_id),
            created_at: identity.created_at,
            source: Some(ListingSource::Api),
            raw: serde_json::to_value(response).ok(),
        }
    }

    /// Pre-fill the form from a stored listing for editing.
    #[must_use]
    pub fn from_record(record: &MyListingRecord) -> Self {
        let number = |value: Option<f64>| match value {
            Some(v) if v != 0.0 => v.to_string(),
            _ => String::new(),
        };

        Self {
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
            price: number(record.price),
            stock: record
                .stock
                .filter(|s| *s != 0)
                .map(|s| s.to_string())
                .unwrap_or_default(),
            discount: number(record.discount_percentage),
            discount_type: record.discount_type.clone().unwrap_or_default(),
            category: record.category.clone().unwrap_or_default(),
            images: record.images.clone(),
            primary_image: 0,
        }
    }
}

/// Loads, saves and discards the single draft slot.
#[derive(Clone)]
pub struct DraftStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl std::fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStore").finish_non_exhaustive()
    }
}

impl DraftStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Current draft. Missing or malformed drafts load as an empty form.
    #[must_use]
    pub fn load(&self) -> ListingDraft {
        match self.storage.get_item(DRAFT_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Failed to parse draft");
                ListingDraft::default()
            }),
            Ok(None) => ListingDraft::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read draft");
                ListingDraft::default()
            }
        }
    }

    /// Replace the stored draft.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the draft cannot be written.
    pub fn save(&self, draft: &ListingDraft) -> Result<(), StorageError> {
        let json = serde_json::to_string(draft)?;
        self.storage.set_item(DRAFT_KEY, &json)
    }

    /// Forget the stored draft.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the draft cannot be removed.
    pub fn discard(&self) -> Result<(), StorageError> {
        self.storage.remove_item(DRAFT_KEY)
    }
}
