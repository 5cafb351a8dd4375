//! Favorites: toggle-membership set of product summaries.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use buycom_core::{ProductId, ProductSummary};

/// Result of toggling a product's favorite membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteToggle {
    Added,
    Removed,
}

/// Favorited products in insertion order, at most one entry per product id.
///
/// Serializes as the persisted slot shape `{ "items": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoritesState {
    items: Vec<ProductSummary>,
}

impl FavoritesState {
    /// Add the product when absent, remove it when present.
    ///
    /// Re-adding a removed product appends it at the end.
    pub fn toggle(&mut self, product: ProductSummary) -> FavoriteToggle {
        if let Some(index) = self.position(product.id) {
            self.items.remove(index);
            FavoriteToggle::Removed
        } else {
            self.items.push(product);
            FavoriteToggle::Added
        }
    }

    /// Remove every favorite.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Favorites, oldest first.
    #[must_use]
    pub fn items(&self) -> &[ProductSummary] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&ProductSummary> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop repeated ids read from storage, keeping the first occurrence.
    ///
    /// Returns the number of entries removed.
    pub(crate) fn normalize(&mut self) -> usize {
        let before = self.items.len();
        let mut seen = HashSet::new();
        self.items.retain(|item| seen.insert(item.id));
        before - self.items.len()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::store::test_support::summary;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = FavoritesState::default();
        assert_eq!(favorites.toggle(summary(1, "$10.00")), FavoriteToggle::Added);
        assert!(favorites.contains(ProductId::new(1)));
        assert_eq!(favorites.toggle(summary(1, "$10.00")), FavoriteToggle::Removed);
        assert!(favorites.is_empty());
    }

    fn membership(favorites: &FavoritesState) -> BTreeSet<i64> {
        favorites.items().iter().map(|p| p.id.as_i64()).collect()
    }

    #[test]
    fn test_toggle_twice_is_involution() {
        let mut favorites = FavoritesState::default();
        favorites.toggle(summary(1, "$1.00"));
        favorites.toggle(summary(2, "$2.00"));
        let before = membership(&favorites);

        for id in [1, 2, 3] {
            favorites.toggle(summary(id, "$9.99"));
            favorites.toggle(summary(id, "$9.99"));
            assert_eq!(membership(&favorites), before);
        }
    }

    #[test]
    fn test_retoggle_appends_at_end() {
        let mut favorites = FavoritesState::default();
        favorites.toggle(summary(1, "$1.00"));
        favorites.toggle(summary(2, "$2.00"));
        favorites.toggle(summary(1, "$1.00"));
        favorites.toggle(summary(1, "$1.00"));

        let ids: Vec<_> = favorites.items().iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut favorites = FavoritesState::default();
        favorites.toggle(summary(1, "$1.00"));
        favorites.toggle(summary(2, "$2.00"));
        favorites.clear();
        assert_eq!(favorites.len(), 0);
    }

    #[test]
    fn test_normalize_drops_repeated_ids() {
        let mut favorites = FavoritesState {
            items: vec![summary(1, "$1.00"), summary(2, "$2.00"), summary(1, "$9.00")],
        };

        assert_eq!(favorites.normalize(), 1);
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites.get(ProductId::new(1)).unwrap().price, "$1.00");
    }
}
