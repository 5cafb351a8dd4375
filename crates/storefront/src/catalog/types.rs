//! Catalog API payloads.
//!
//! Field names follow the remote API (camelCase). Everything beyond
//! `id`/`title`/`price` is optional or defaulted because search results and
//! freshly created products carry only a subset.

use serde::{Deserialize, Serialize};

use buycom_core::{Price, ProductId, ProductSummary};

/// A product record as returned by list, search and popular endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub availability_status: Option<String>,
}

impl CatalogProduct {
    /// Typed price, or `None` if the catalog sent a non-finite value.
    #[must_use]
    pub fn typed_price(&self) -> Option<Price> {
        Price::from_f64(self.price)
    }

    /// First gallery image, falling back to the thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(self.thumbnail.as_str(), String::as_str)
    }
}

impl From<&CatalogProduct> for ProductSummary {
    fn from(product: &CatalogProduct) -> Self {
        let price = product.typed_price();
        Self {
            id: product.id,
            name: product.title.clone(),
            price: price.map_or_else(|| format!("${:.2}", product.price), |p| p.display()),
            image: product.primary_image().to_string(),
            category: product.category.clone(),
            rating: product.rating,
            amount: price.map(|p| p.amount),
        }
    }
}

/// Full product record from `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: CatalogProduct,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub warranty_information: Option<String>,
    #[serde(default)]
    pub shipping_information: Option<String>,
    #[serde(default)]
    pub minimum_order_quantity: Option<u32>,
    #[serde(default)]
    pub return_policy: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Physical dimensions of a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub rating: f64,
    pub comment: String,
    pub date: String,
    pub reviewer_name: String,
    #[serde(default)]
    pub reviewer_email: Option<String>,
}

/// One page of products with the overall total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<CatalogProduct>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

/// Search endpoint envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub products: Vec<CatalogProduct>,
}

/// Sort field for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Title,
    Price,
}

impl SortBy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Price => "price",
        }
    }
}

/// Sort direction for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Parameters for [`CatalogClient::list_products`](super::CatalogClient::list_products).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListParams {
    /// Page size (default 15).
    pub limit: Option<u32>,
    /// Offset (default 0).
    pub skip: Option<u32>,
    pub sort_by: Option<SortBy>,
    /// Only sent alongside `sort_by`; defaults to ascending.
    pub order: Option<SortOrder>,
    /// Restricts the listing to one category slug.
    pub category: Option<String>,
}

/// Body for creating or updating a catalog product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub stock: i64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<String>,
}

/// Catalog echo of a created or updated product.
///
/// The remote API returns whatever it accepted, so every field but `id` may
/// be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub id: ProductId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

/// HTTP method used for product updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMethod {
    #[default]
    Patch,
    Put,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const PRODUCT_JSON: &str = r#"{
        "id": 1,
        "title": "Essence Mascara Lash Princess",
        "description": "Popular mascara",
        "category": "beauty",
        "price": 9.99,
        "discountPercentage": 7.17,
        "rating": 4.94,
        "stock": 5,
        "tags": ["beauty", "mascara"],
        "brand": "Essence",
        "images": ["https://cdn.example.com/1/1.png"],
        "thumbnail": "https://cdn.example.com/1/thumbnail.png",
        "availabilityStatus": "Low Stock"
    }"#;

    #[test]
    fn test_projects_into_summary() {
        let product: CatalogProduct = serde_json::from_str(PRODUCT_JSON).unwrap();
        let summary = ProductSummary::from(&product);

        assert_eq!(summary.id, ProductId::new(1));
        assert_eq!(summary.name, "Essence Mascara Lash Princess");
        assert_eq!(summary.price, "$9.99");
        assert_eq!(summary.amount, Some(Decimal::new(999, 2)));
        assert_eq!(summary.image, "https://cdn.example.com/1/1.png");
        assert_eq!(summary.category, "beauty");
    }

    #[test]
    fn test_summary_falls_back_to_thumbnail() {
        let json = r#"{"id": 2, "title": "Lamp", "price": 20, "thumbnail": "t.png"}"#;
        let product: CatalogProduct = serde_json::from_str(json).unwrap();
        assert_eq!(ProductSummary::from(&product).image, "t.png");
    }

    #[test]
    fn test_detail_parses_nested_fields() {
        let json = r#"{
            "id": 3, "title": "Chair", "price": 49.5, "category": "furniture",
            "sku": "CH-1", "weight": 4,
            "dimensions": {"width": 1.5, "height": 2, "depth": 3},
            "reviews": [{"rating": 5, "comment": "Great",
                "date": "2024-05-23T08:56:21.618Z", "reviewerName": "Ana"}]
        }"#;
        let detail: ProductDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.product.title, "Chair");
        assert_eq!(detail.sku.as_deref(), Some("CH-1"));
        assert_eq!(detail.reviews.len(), 1);
        assert_eq!(detail.dimensions.map(|d| d.depth), Some(3.0));
    }

    #[test]
    fn test_payload_uses_camel_case() {
        let payload = ProductPayload {
            title: "Desk".to_string(),
            discount_percentage: 10.0,
            ..ProductPayload::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["discountPercentage"], 10.0);
        assert!(json.get("discountType").is_none());
    }
}
