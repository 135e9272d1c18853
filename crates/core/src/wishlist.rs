//! Saved-for-later products. Set semantics by product id.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::ProductId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// The saved copy of a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == product_id)
    }

    /// Add a product unless one with the same id is already saved.
    pub fn add(&mut self, product: Product) {
        if !self.contains(product.id) {
            self.items.push(product);
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|p| p.id != product_id);
    }

    /// Add or remove. Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, product: Product) -> bool {
        if self.contains(product.id) {
            self.remove(product.id);
            false
        } else {
            self.items.push(product);
            true
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::product::tests::product;
    use crate::types::Price;

    #[test]
    fn test_product_cannot_appear_twice() {
        let mut wishlist = Wishlist::default();
        wishlist.add(product(1, "Backpack", 10995, "bags"));
        wishlist.add(product(1, "Backpack", 10995, "bags"));
        assert_eq!(wishlist.count(), 1);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.toggle(product(3, "Ring", 999, "jewelery")));
        assert!(wishlist.contains(ProductId::new(3)));
        assert!(!wishlist.toggle(product(3, "Ring", 999, "jewelery")));
        assert!(!wishlist.contains(ProductId::new(3)));
    }

    #[test]
    fn test_get_returns_saved_copy() {
        let mut wishlist = Wishlist::default();
        wishlist.add(product(4, "Drive", 6400, "electronics"));
        assert_eq!(
            wishlist.get(ProductId::new(4)).map(|p| p.price),
            Some(Price::from_cents(6400))
        );
        assert!(wishlist.get(ProductId::new(5)).is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut wishlist = Wishlist::default();
        wishlist.add(product(1, "Backpack", 10995, "bags"));
        wishlist.add(product(2, "Shirt", 2230, "tops"));
        wishlist.remove(ProductId::new(1));
        assert_eq!(wishlist.items()[0].id, ProductId::new(2));
        wishlist.clear();
        assert_eq!(wishlist.count(), 0);
    }

    #[test]
    fn test_serializes_as_product_array() {
        let mut wishlist = Wishlist::default();
        wishlist.add(product(1, "Backpack", 10995, "bags"));
        let json = serde_json::to_value(&wishlist).unwrap();
        assert!(json.is_array());
        let back: Wishlist = serde_json::from_value(json).unwrap();
        assert_eq!(back, wishlist);
    }
}
