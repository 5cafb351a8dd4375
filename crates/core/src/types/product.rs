//! Product summary snapshot stored in favorites and the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Price, parse_price_label};

/// Minimal denormalized product snapshot.
///
/// Taken from a richer catalog record at the moment a user favorites or carts
/// a product. No back-reference to the catalog is kept, so later catalog edits
/// do not reach stored entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    /// Pre-formatted price label (e.g. `"$79.99"`).
    pub price: String,
    pub image: String,
    pub category: String,
    pub rating: f64,
    /// Numeric unit price carried alongside the label.
    ///
    /// Absent in entries persisted by older builds; [`Self::unit_price`] falls
    /// back to parsing the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
}

impl ProductSummary {
    /// Build a summary whose label is derived from a typed price.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Price,
        image: impl Into<String>,
        category: impl Into<String>,
        rating: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price: price.display(),
            image: image.into(),
            category: category.into(),
            rating,
            amount: Some(price.amount),
        }
    }

    /// Numeric unit price used for cart arithmetic.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.amount.unwrap_or_else(|| parse_price_label(&self.price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::CurrencyCode;

    fn label_only(price: &str) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(1),
            name: "Essence Mascara".to_string(),
            price: price.to_string(),
            image: "https://cdn.example.com/1.webp".to_string(),
            category: "beauty".to_string(),
            rating: 4.5,
            amount: None,
        }
    }

    #[test]
    fn test_unit_price_prefers_amount() {
        let summary = ProductSummary::new(
            ProductId::new(7),
            "Lamp",
            Price::new(Decimal::new(1999, 2), CurrencyCode::USD),
            "lamp.png",
            "home-decoration",
            3.9,
        );
        assert_eq!(summary.price, "$19.99");
        assert_eq!(summary.unit_price(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_unit_price_falls_back_to_label() {
        assert_eq!(label_only("$79.99").unit_price(), Decimal::new(7999, 2));
    }

    #[test]
    fn test_legacy_json_without_amount_deserializes() {
        let json = r#"{"id":3,"name":"Bag","price":"$10.00","image":"b.png",
            "category":"bags","rating":4}"#;
        let summary: ProductSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.amount, None);
        assert_eq!(summary.unit_price(), Decimal::new(10, 0));
        assert!(!serde_json::to_string(&summary).unwrap().contains("amount"));
    }
}
