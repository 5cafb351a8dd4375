//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::listings::{DraftError, ListingError};
use crate::storage::StorageError;

/// Message shown when a state transition could not be applied.
pub const DISPATCH_FAILED_MESSAGE: &str = "Something went wrong, please try again";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Listing store operation failed.
    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Listing draft is incomplete.
    #[error("Invalid draft: {0}")]
    Draft(#[from] DraftError),

    /// State container could not apply an action.
    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(err) => match err {
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Listing(ListingError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Draft(_) => StatusCode::BAD_REQUEST,
            Self::Listing(_) | Self::Storage(_) | Self::Dispatch(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Dispatch(_) => DISPATCH_FAILED_MESSAGE.to_string(),
            Self::Listing(ListingError::NotFound(_)) => self.to_string(),
            Self::Listing(_) | Self::Storage(_) => "Internal server error".to_string(),
            Self::Catalog(CatalogError::NotFound(_)) => "Product not found".to_string(),
            Self::Catalog(CatalogError::RateLimited(_)) => {
                "Too many requests, please try again later".to_string()
            }
            Self::Catalog(_) => "External service error".to_string(),
            Self::Draft(err) => err.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use buycom_core::ListingId;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Listing(ListingError::NotFound(ListingId::new(12)));
        assert_eq!(err.to_string(), "Listing error: Listing not found: 12");

        let err = AppError::Draft(DraftError::MissingField("title"));
        assert_eq!(err.to_string(), "Invalid draft: Missing required field: title");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::Catalog(CatalogError::NotFound("1".to_string()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::RateLimited(30))),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::Status {
                status: 500,
                message: "boom".to_string(),
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Listing(ListingError::NotFound(ListingId::new(7)))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Draft(DraftError::NoImages)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Dispatch("poisoned".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_dispatch_error_hides_detail() {
        let response = AppError::Dispatch("lock poisoned".to_string()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["error"], DISPATCH_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_storage_error_hides_detail() {
        let err = AppError::Storage(StorageError::QuotaExceeded("cart".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Internal server error");
    }
}
