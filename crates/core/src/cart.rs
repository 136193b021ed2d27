//! Session-local shopping cart.
//!
//! The cart lives only in the shopper's session; it is never written to the
//! marketplace store. Item count and subtotal are derived on every read.

use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::types::{Price, ProductId};

/// Most units of one product a cart line can hold.
pub const MAX_QUANTITY: u32 = 999;

/// A cart line: a product snapshot and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// The shopper's cart.
///
/// Invariant: every line has `1 <= quantity <= MAX_QUANTITY` and product IDs
/// are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `product`, merging with an existing line. A full line
    /// stays at [`MAX_QUANTITY`].
    pub fn add(&mut self, product: Product) {
        if let Some(line) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(1).min(MAX_QUANTITY);
        } else {
            self.items.push(CartItem {
                product,
                quantity: 1,
            });
        }
    }

    /// Set a line's quantity. Zero or below removes the line; anything above
    /// [`MAX_QUANTITY`] is capped.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        let quantity = u32::try_from(quantity).map_or(MAX_QUANTITY, |q| q.min(MAX_QUANTITY));
        if let Some(line) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product.id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, i| count.saturating_add(i.quantity))
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Take the lines out, leaving the cart empty (used at checkout).
    #[must_use]
    pub fn take_items(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }
}
