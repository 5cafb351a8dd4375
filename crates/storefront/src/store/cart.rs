//! Cart: quantity-tracked collection of product summaries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use buycom_core::{ProductId, ProductSummary};

/// A product in the cart with its quantity.
///
/// Serialized flat: the summary fields plus `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: ProductSummary,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartEntry {
    /// Unit price × quantity, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product
            .unit_price()
            .saturating_mul(Decimal::from(self.quantity))
    }
}

/// Cart contents in insertion order, at most one entry per product id.
///
/// Serializes as the persisted slot shape `{ "items": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<CartEntry>,
}

impl CartState {
    /// Add `quantity` units of a product.
    ///
    /// Quantities are additive for a product already in the cart. A quantity
    /// of zero is treated as one.
    pub fn add(&mut self, product: ProductSummary, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(entry) = self.entry_mut(product.id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartEntry { product, quantity });
        }
    }

    /// Remove a product regardless of its quantity. Missing ids are ignored.
    pub fn remove(&mut self, id: ProductId) {
        self.items.retain(|entry| entry.product.id != id);
    }

    /// Set the quantity of an existing entry, clamped to at least 1.
    ///
    /// Missing ids are ignored; no entry is created.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        let Some(entry) = self.entry_mut(id) else {
            return;
        };
        entry.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of unit price × quantity over all entries.
    ///
    /// Saturates at the `Decimal` bounds instead of overflowing.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(CartEntry::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Total number of units across entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|entry| u64::from(entry.quantity)).sum()
    }

    #[must_use]
    pub fn items(&self) -> &[CartEntry] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.items.iter().find(|entry| entry.product.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Restore the invariants on entries read from storage: quantities of
    /// zero become one and repeated ids merge into the first entry.
    ///
    /// Returns the number of entries that had to be repaired.
    pub(crate) fn normalize(&mut self) -> usize {
        let mut repaired = 0;
        for entry in std::mem::take(&mut self.items) {
            if entry.quantity == 0 || self.get(entry.product.id).is_some() {
                repaired += 1;
            }
            self.add(entry.product, entry.quantity);
        }
        repaired
    }

    fn entry_mut(&mut self, id: ProductId) -> Option<&mut CartEntry> {
        self.items.iter_mut().find(|entry| entry.product.id == id)
    }
}
