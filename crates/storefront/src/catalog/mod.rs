//! Product catalog REST API client.
//!
//! # Architecture
//!
//! - The remote catalog is the source of truth for products; nothing is synced
//!   locally apart from the summaries users put in favorites or the cart
//! - Reads are cached in memory via `moka` (5 minute TTL by default)
//! - Mutations (create, update, delete) bypass the cache and invalidate it
//!
//! # Endpoints
//!
//! ```text
//! GET    /products?limit=&skip=&sortBy=&order=
//! GET    /products/category/{slug}?limit=&skip=&sortBy=&order=
//! GET    /products/{id}
//! GET    /products/category-list
//! GET    /products/search?q=
//! POST   /products/add
//! PATCH  /products/{id}   (or PUT)
//! DELETE /products/{id}
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use buycom_storefront::catalog::{CatalogClient, ListParams, SortBy};
//!
//! let client = CatalogClient::new(&config.catalog);
//!
//! let page = client
//!     .list_products(&ListParams {
//!         sort_by: Some(SortBy::Price),
//!         ..ListParams::default()
//!     })
//!     .await?;
//! let hits = client.search("mascara").await?;
//! ```

mod cache;
pub mod types;

pub use types::*;

use std::sync::Arc;

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use buycom_core::ProductId;

use crate::browse::{DEFAULT_PAGE_SIZE, normalize_search_query};
use crate::config::CatalogConfig;
use cache::{CacheKey, CacheValue};

/// Number of products shown in the popular strip.
pub const DEFAULT_POPULAR_LIMIT: u32 = 10;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Base URL cannot carry path segments.
    #[error("Invalid catalog base URL: {0}")]
    InvalidBaseUrl(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the catalog.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status.
    #[error("Catalog returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

/// Client for the product catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    /// Build an endpoint URL from path segments below the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON response.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T, CatalogError> {
        let response = request
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(what.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T, CatalogError> {
        debug!(url = %url, "Catalog request");
        self.send(self.inner.client.get(url), what).await
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &B,
        what: &str,
    ) -> Result<T, CatalogError> {
        debug!(url = %url, method = %method, "Catalog mutation");
        let result = self
            .send(self.inner.client.request(method, url).json(body), what)
            .await;
        self.inner.cache.invalidate_all();
        result
    }

    // =========================================================================
    // Read Methods
    // =========================================================================

    /// Get the first `limit` products for the home page strip.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn popular_products(&self, limit: u32) -> Result<Vec<CatalogProduct>, CatalogError> {
        let cache_key = CacheKey::Popular { limit };
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for popular products");
            return Ok(products);
        }

        let mut url = self.endpoint(&["products"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let page: ProductPage = self.get_json(url, "products").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.products.clone()))
            .await;

        Ok(page.products)
    }

    /// Get a product by its catalog ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<ProductDetail, CatalogError> {
        let cache_key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", &id.to_string()])?;
        let product: ProductDetail = self.get_json(url, &format!("product {id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get the list of category slugs.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let url = self.endpoint(&["products", "category-list"])?;
        let categories: Vec<String> = self.get_json(url, "categories").await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Full-text product search.
    ///
    /// The query is trimmed; queries shorter than two characters return no
    /// results without contacting the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogProduct>, CatalogError> {
        let Some(query) = normalize_search_query(query) else {
            return Ok(Vec::new());
        };

        let cache_key = CacheKey::Search(query.to_string());
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for search");
            return Ok(products);
        }

        let mut url = self.endpoint(&["products", "search"])?;
        url.query_pairs_mut().append_pair("q", query);

        let response: SearchResponse = self.get_json(url, "search").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(response.products.clone()))
            .await;

        Ok(response.products)
    }

    /// Get one page of products, optionally sorted and restricted to a
    /// category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, params: &ListParams) -> Result<ProductPage, CatalogError> {
        let cache_key = CacheKey::Page(params.clone());
        if let Some(CacheValue::Page(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product page");
            return Ok(page);
        }

        let mut url = match &params.category {
            Some(category) => self.endpoint(&["products", "category", category])?,
            None => self.endpoint(&["products"])?,
        };
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(
                "limit",
                &params.limit.unwrap_or(DEFAULT_PAGE_SIZE).to_string(),
            );
            query.append_pair("skip", &params.skip.unwrap_or(0).to_string());
            if let Some(sort_by) = params.sort_by {
                query.append_pair("sortBy", sort_by.as_str());
                query.append_pair("order", params.order.unwrap_or_default().as_str());
            }
        }

        let page: ProductPage = self.get_json(url, "products").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Page(page.clone()))
            .await;

        Ok(page)
    }

    // =========================================================================
    // Mutation Methods
    // =========================================================================

    /// Publish a new product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn create_product(
        &self,
        payload: &ProductPayload,
    ) -> Result<MutationResponse, CatalogError> {
        let url = self.endpoint(&["products", "add"])?;
        self.send_json(reqwest::Method::POST, url, payload, "create product")
            .await
    }

    /// Update an existing product with PATCH or PUT semantics.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self, payload), fields(id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        payload: &ProductPayload,
        method: UpdateMethod,
    ) -> Result<MutationResponse, CatalogError> {
        let url = self.endpoint(&["products", &id.to_string()])?;
        let method = match method {
            UpdateMethod::Patch => reqwest::Method::PATCH,
            UpdateMethod::Put => reqwest::Method::PUT,
        };
        self.send_json(method, url, payload, &format!("product {id}"))
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        let url = self.endpoint(&["products", &id.to_string()])?;
        debug!(url = %url, "Catalog delete");
        let result: Result<serde_json::Value, _> = self
            .send(self.inner.client.delete(url), &format!("product {id}"))
            .await;
        self.inner.cache.invalidate_all();
        result.map(|_| ())
    }
}
