//! Shop browsing helpers: paging, sort selections, availability filters and
//! search query normalization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogProduct, ListParams, SortBy, SortOrder};

/// Products per shop page.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Shortest search query sent to the catalog.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Trim a search query. Returns `None` when it is too short to search.
#[must_use]
pub fn normalize_search_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    (trimmed.chars().count() >= MIN_SEARCH_QUERY_LEN).then_some(trimmed)
}

/// Number of pages needed for `total` products. Zero products means zero pages.
#[must_use]
pub const fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size as u64)
}

/// Zero-based page to catalog offset.
#[must_use]
pub fn skip_for_page(page: u32, page_size: u32) -> u32 {
    page.saturating_mul(page_size)
}

/// Page indices shown in the pager for the zero-based `page`.
///
/// Up to four pages are all shown. Beyond that the first three pages and the
/// last page are always shown, plus the current page when it sits in the
/// middle, or the two pages before the last when the current page is near
/// the end.
#[must_use]
pub fn page_window(page: u64, total_pages: u64) -> Vec<u64> {
    if total_pages == 0 {
        return Vec::new();
    }
    if total_pages <= 4 {
        return (0..total_pages).collect();
    }

    let last = total_pages - 1;
    let mut items: BTreeSet<u64> = [0, 1, 2].into_iter().collect();

    if page > 2 && page < last - 1 {
        items.insert(page);
    }
    if page >= last - 1 {
        items.insert(last - 2);
        items.insert(last - 1);
    }

    items.retain(|&i| i < last);
    items.into_iter().chain(std::iter::once(last)).collect()
}

/// Sort options offered in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortSelection {
    #[default]
    #[serde(rename = "title-asc")]
    TitleAsc,
    #[serde(rename = "title-desc")]
    TitleDesc,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
}

impl SortSelection {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TitleAsc => "Title (A-Z)",
            Self::TitleDesc => "Title (Z-A)",
            Self::PriceAsc => "Price (Low-High)",
            Self::PriceDesc => "Price (High-Low)",
        }
    }

    /// Catalog sort field and direction.
    #[must_use]
    pub const fn sort(&self) -> (SortBy, SortOrder) {
        match self {
            Self::TitleAsc => (SortBy::Title, SortOrder::Asc),
            Self::TitleDesc => (SortBy::Title, SortOrder::Desc),
            Self::PriceAsc => (SortBy::Price, SortOrder::Asc),
            Self::PriceDesc => (SortBy::Price, SortOrder::Desc),
        }
    }
}

/// Stock availability filter, matched against the product's status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    InStock,
    LowStock,
    OutOfStock,
}

impl Availability {
    /// Parse a filter id such as `in-stock`.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "in-stock" => Some(Self::InStock),
            "low-stock" => Some(Self::LowStock),
            "out-of-stock" => Some(Self::OutOfStock),
            _ => None,
        }
    }

    /// Whether a catalog availability status matches this filter.
    #[must_use]
    pub fn matches(&self, status: &str) -> bool {
        let status = status.to_lowercase();
        match self {
            Self::InStock => status.contains("stock") && status.contains("in"),
            Self::LowStock => status.contains("low"),
            Self::OutOfStock => status.contains("out"),
        }
    }
}

/// Keep products matching any of `filters`. No filters keeps everything.
#[must_use]
pub fn filter_by_availability(
    products: Vec<CatalogProduct>,
    filters: &[Availability],
) -> Vec<CatalogProduct> {
    if filters.is_empty() {
        return products;
    }

    products
        .into_iter()
        .filter(|product| {
            let status = product.availability_status.as_deref().unwrap_or("");
            filters.iter().any(|filter| filter.matches(status))
        })
        .collect()
}

/// Shop page request after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopQuery {
    /// Zero-based page.
    pub page: u32,
    pub sort: SortSelection,
    pub category: Option<String>,
    pub availability: Vec<Availability>,
}

impl ShopQuery {
    /// Catalog parameters for this page.
    #[must_use]
    pub fn list_params(&self, page_size: u32) -> ListParams {
        let (sort_by, order) = self.sort.sort();
        ListParams {
            limit: Some(page_size),
            skip: Some(skip_for_page(self.page, page_size)),
            sort_by: Some(sort_by),
            order: Some(order),
            category: self.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, status: Option<&str>) -> CatalogProduct {
        CatalogProduct {
            id: buycom_core::ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            category: "beauty".to_string(),
            price: 1.0,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 0,
            brand: None,
            tags: Vec::new(),
            images: Vec::new(),
            thumbnail: String::new(),
            availability_status: status.map(String::from),
        }
    }

    #[test]
    fn test_normalize_search_query() {
        assert_eq!(normalize_search_query("  lamp "), Some("lamp"));
        assert_eq!(normalize_search_query("ab"), Some("ab"));
        assert_eq!(normalize_search_query(" a "), None);
        assert_eq!(normalize_search_query(""), None);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 15), 0);
        assert_eq!(total_pages(1, 15), 1);
        assert_eq!(total_pages(15, 15), 1);
        assert_eq!(total_pages(194, 15), 13);
    }

    #[test]
    fn test_skip_for_page() {
        assert_eq!(skip_for_page(0, 15), 0);
        assert_eq!(skip_for_page(3, 15), 45);
    }

    #[test]
    fn test_page_window_small() {
        assert!(page_window(0, 0).is_empty());
        assert_eq!(page_window(0, 3), vec![0, 1, 2]);
        assert_eq!(page_window(3, 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_page_window_large() {
        assert_eq!(page_window(0, 13), vec![0, 1, 2, 12]);
        assert_eq!(page_window(6, 13), vec![0, 1, 2, 6, 12]);
        assert_eq!(page_window(11, 13), vec![0, 1, 2, 10, 11, 12]);
        assert_eq!(page_window(12, 13), vec![0, 1, 2, 10, 11, 12]);
        assert_eq!(page_window(3, 5), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_availability_matching() {
        assert!(Availability::InStock.matches("In Stock"));
        assert!(!Availability::InStock.matches("Low Stock"));
        assert!(Availability::LowStock.matches("Low Stock"));
        assert!(Availability::OutOfStock.matches("Out of Stock"));
        assert_eq!(Availability::from_id("low-stock"), Some(Availability::LowStock));
        assert_eq!(Availability::from_id("bogus"), None);
    }

    #[test]
    fn test_filter_by_availability() {
        let products = vec![
            product(1, Some("In Stock")),
            product(2, Some("Low Stock")),
            product(3, None),
        ];

        let all = filter_by_availability(products.clone(), &[]);
        assert_eq!(all.len(), 3);

        let low = filter_by_availability(products, &[Availability::LowStock]);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id.as_i64(), 2);
    }

    #[test]
    fn test_shop_query_params() {
        let query = ShopQuery {
            page: 2,
            sort: SortSelection::PriceDesc,
            category: Some("laptops".to_string()),
            availability: Vec::new(),
        };
        let params = query.list_params(15);
        assert_eq!(params.skip, Some(30));
        assert_eq!(params.sort_by, Some(SortBy::Price));
        assert_eq!(params.order, Some(SortOrder::Desc));
        assert_eq!(params.category.as_deref(), Some("laptops"));
    }
}
