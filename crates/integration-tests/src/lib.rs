//! Integration tests for Buycom.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p buycom-integration-tests
//! ```
//!
//! Tests drive the storefront router in process with
//! `tower::ServiceExt::oneshot`; nothing binds a public port. Catalog calls go
//! to [`MockCatalog`], a small axum app on an ephemeral local port.
//!
//! # Test Categories
//!
//! - `storefront_favorites` - Favorites API
//! - `storefront_cart` - Cart API and totals
//! - `storefront_persistence` - State surviving a restart of the service
//! - `storefront_catalog` - Browsing, search and "my ads" against the mock catalog

pub mod mock_catalog;

pub use mock_catalog::MockCatalog;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use buycom_core::{ProductId, ProductSummary};
use buycom_storefront::config::{CatalogConfig, StorefrontConfig};
use buycom_storefront::routes;
use buycom_storefront::state::AppState;
use buycom_storefront::storage::FileStorage;

/// Catalog URL nothing listens on, for tests that never reach the catalog.
const UNREACHABLE_CATALOG: &str = "http://127.0.0.1:9";

/// A storefront backed by a throwaway data directory.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    pub data_dir: PathBuf,
    pub app: Router,
    catalog_url: Url,
}

impl TestContext {
    /// Storefront with no reachable catalog.
    ///
    /// # Panics
    ///
    /// Panics if the data directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let catalog_url = Url::parse(UNREACHABLE_CATALOG).expect("static URL");
        Self::with_catalog_url(catalog_url)
    }

    /// Storefront talking to `catalog`.
    ///
    /// # Panics
    ///
    /// Panics if the data directory cannot be created.
    #[must_use]
    pub fn with_catalog(catalog: &MockCatalog) -> Self {
        Self::with_catalog_url(catalog.base_url())
    }

    fn with_catalog_url(catalog_url: Url) -> Self {
        let data_dir =
            std::env::temp_dir().join(format!("buycom-integration-{}", uuid::Uuid::new_v4()));
        let app = build_app(&data_dir, catalog_url.clone());
        Self {
            data_dir,
            app,
            catalog_url,
        }
    }

    /// Build a fresh storefront over the same data directory, as if the
    /// service had been restarted.
    #[must_use]
    pub fn restart(&self) -> Router {
        build_app(&self.data_dir, self.catalog_url.clone())
    }

    /// Send a request to the current app.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.app, method, uri, body).await
    }

    /// Read a persisted slot straight from the data directory.
    #[must_use]
    pub fn stored(&self, key: &str) -> Option<Value> {
        let raw = std::fs::read_to_string(self.data_dir.join(format!("{key}.json"))).ok()?;
        serde_json::from_str(&raw).ok()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

fn build_app(data_dir: &Path, catalog_url: Url) -> Router {
    let config = StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        data_dir: data_dir.to_path_buf(),
        page_size: 2,
        catalog: CatalogConfig {
            base_url: catalog_url,
            cache_ttl: Duration::from_secs(60),
        },
        sentry_dsn: None,
        sentry_environment: None,
    };
    let storage = FileStorage::open(data_dir).expect("open data directory");
    routes::app(AppState::new(config, Arc::new(storage)))
}

/// Send a request to `app` and decode the JSON body (`Null` when empty).
///
/// # Panics
///
/// Panics if the request cannot be built or the body cannot be read.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// A product summary with a label-only price.
#[must_use]
pub fn summary(id: i64, price: &str) -> ProductSummary {
    ProductSummary {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price: price.to_string(),
        image: format!("https://cdn.example.com/{id}.webp"),
        category: "beauty".to_string(),
        rating: 4.5,
        amount: None,
    }
}
