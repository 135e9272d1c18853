//! Shopping cart.
//!
//! A cart is a list of lines, one per product, each holding a snapshot of the
//! product taken when it was first added. Quantities are always at least 1; a
//! line whose quantity drops to 0 is removed.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId};

/// A cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price of the product times the quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The visitor's cart plus the sidebar open flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
    is_open: bool,
}

impl Cart {
    /// Rebuild a cart from stored lines, dropping any empty ones.
    #[must_use]
    pub fn from_lines(items: Vec<CartItem>, is_open: bool) -> Self {
        let items = items.into_iter().filter(|item| item.quantity > 0).collect();
        Self { items, is_open }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the cart, returning its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit. An existing line is incremented instead of duplicated.
    pub fn add(&mut self, product: Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                product,
                quantity: 1,
            });
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.product.id != product_id);
    }

    /// Set a line's quantity; 0 removes the line. Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub const fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    pub const fn open(&mut self) {
        self.is_open = true;
    }

    pub const fn close(&mut self) {
        self.is_open = false;
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Quantity of a product, 0 when it is not in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| item.product.id == product_id)
            .map_or(0, |item| item.quantity)
    }
}
