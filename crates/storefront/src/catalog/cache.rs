//! Cache types for catalog API responses.

use buycom_core::ProductId;

use super::types::{CatalogProduct, ListParams, ProductDetail, ProductPage};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Popular { limit: u32 },
    Product(ProductId),
    Categories,
    Search(String),
    Page(ListParams),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<CatalogProduct>),
    Product(Box<ProductDetail>),
    Categories(Vec<String>),
    Page(ProductPage),
}
