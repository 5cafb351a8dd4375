//! Product browsing route handlers.
//!
//! Thin JSON wrappers over the catalog client. Every product card carries a
//! ready-made [`ProductSummary`] so clients can post it straight back to the
//! favorites and cart endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use buycom_core::{ProductId, ProductSummary};

use crate::browse::{
    Availability, ShopQuery, SortSelection, filter_by_availability, page_window, total_pages,
};
use crate::catalog::{CatalogProduct, DEFAULT_POPULAR_LIMIT, ProductDetail};
use crate::error::Result;
use crate::state::AppState;

/// A catalog product plus the summary stored in favorites and the cart.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCard {
    #[serde(flatten)]
    pub product: CatalogProduct,
    pub summary: ProductSummary,
}

impl From<CatalogProduct> for ProductCard {
    fn from(product: CatalogProduct) -> Self {
        let summary = ProductSummary::from(&product);
        Self { product, summary }
    }
}

fn cards(products: Vec<CatalogProduct>) -> Vec<ProductCard> {
    products.into_iter().map(ProductCard::from).collect()
}

/// Shop listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ShopParams {
    /// Zero-based page.
    pub page: Option<u32>,
    pub sort: Option<SortSelection>,
    pub category: Option<String>,
    /// Comma-separated availability filter ids, e.g. `in-stock,low-stock`.
    pub availability: Option<String>,
}

impl ShopParams {
    fn into_query(self) -> ShopQuery {
        let availability = self
            .availability
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter_map(|id| Availability::from_id(id.trim()))
            .collect();

        ShopQuery {
            page: self.page.unwrap_or(0),
            sort: self.sort.unwrap_or_default(),
            category: self.category.filter(|c| !c.trim().is_empty()),
            availability,
        }
    }
}

/// One page of the shop.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopPage {
    pub products: Vec<ProductCard>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    /// Page indices to render in the pager.
    pub pages: Vec<u64>,
    pub sort: SortSelection,
    pub sort_label: &'static str,
}

/// List products.
///
/// GET /api/products?page=&sort=&category=&availability=
///
/// # Errors
///
/// Returns `AppError::Catalog` if the catalog request fails.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ShopParams>,
) -> Result<Json<ShopPage>> {
    let query = params.into_query();
    let page_size = state.config().page_size;

    let page = state
        .catalog()
        .list_products(&query.list_params(page_size))
        .await?;

    let total_pages = total_pages(page.total, page_size);
    let products = filter_by_availability(page.products, &query.availability);

    Ok(Json(ShopPage {
        products: cards(products),
        total: page.total,
        page: query.page,
        page_size,
        total_pages,
        pages: page_window(u64::from(query.page), total_pages),
        sort: query.sort,
        sort_label: query.sort.label(),
    }))
}

/// Popular products query parameters.
#[derive(Debug, Deserialize)]
pub struct PopularParams {
    pub limit: Option<u32>,
}

/// Popular products for the home page.
///
/// GET /api/products/popular?limit=
///
/// # Errors
///
/// Returns `AppError::Catalog` if the catalog request fails.
#[instrument(skip(state))]
pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> Result<Json<Vec<ProductCard>>> {
    let limit = params.limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    let products = state.catalog().popular_products(limit).await?;
    Ok(Json(cards(products)))
}

/// Product detail with its summary.
#[derive(Debug, Serialize)]
pub struct ProductShow {
    #[serde(flatten)]
    pub detail: ProductDetail,
    pub summary: ProductSummary,
}

/// Product detail.
///
/// GET /api/products/{id}
///
/// # Errors
///
/// Returns `AppError::Catalog` with a 404 status if the product does not exist.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductShow>> {
    let detail = state.catalog().product(id).await?;
    let summary = ProductSummary::from(&detail.product);
    Ok(Json(ProductShow { detail, summary }))
}

/// Category slugs.
///
/// GET /api/categories
///
/// # Errors
///
/// Returns `AppError::Catalog` if the catalog request fails.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.catalog().categories().await?))
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Search response.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub products: Vec<ProductCard>,
}

/// Search products by free text. Queries shorter than two characters return
/// no results.
///
/// GET /api/search?q=
///
/// # Errors
///
/// Returns `AppError::Catalog` if the catalog request fails.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>> {
    let products = state.catalog().search(&params.q).await?;
    Ok(Json(SearchResults {
        query: params.q.trim().to_string(),
        products: cards(products),
    }))
}
