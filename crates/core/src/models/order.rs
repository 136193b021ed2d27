//! Placed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::models::Product;
use crate::types::{OrderId, OrderItemStatus, Price, ProductId, StoreId, UserId};

/// One line of a placed order.
///
/// The product is a snapshot taken at checkout; later catalog edits do not
/// change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: Product,
    pub quantity: u32,
    pub status: OrderItemStatus,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

impl From<CartItem> for OrderItem {
    fn from(item: CartItem) -> Self {
        Self {
            product: item.product,
            quantity: item.quantity,
            status: OrderItemStatus::Processing,
        }
    }
}

/// A placed order.
///
/// `total` is fixed at creation and is not recomputed when the order is
/// filtered down to one store's lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub date: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub total: Price,
}

impl Order {
    /// Build an order from cart lines: every item starts `Processing` and the
    /// total is the sum of price × quantity.
    #[must_use]
    pub fn place(items: Vec<CartItem>, user_id: UserId, millis: i64, now: DateTime<Utc>) -> Self {
        let items: Vec<OrderItem> = items.into_iter().map(OrderItem::from).collect();
        let total = items.iter().map(OrderItem::line_total).sum();
        Self {
            id: OrderId::new(format!("BLIFE-{millis}")),
            user_id,
            date: now,
            items,
            total,
        }
    }

    /// A copy holding only the lines sold by `store_id`, or `None` when the
    /// order has none.
    #[must_use]
    pub fn for_store(&self, store_id: &StoreId) -> Option<Self> {
        let items: Vec<OrderItem> = self
            .items
            .iter()
            .filter(|item| &item.product.store_id == store_id)
            .cloned()
            .collect();
        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            ..self.clone()
        })
    }

    /// Whether any line is for `product_id`.
    #[must_use]
    pub fn contains_product(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.product.id == product_id)
    }

    /// Sum of the line totals currently in this order.
    ///
    /// Equals `total` for a full order; for a store-filtered copy it is that
    /// store's share.
    #[must_use]
    pub fn items_total(&self) -> Price {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Set the status of the line for `product_id`. Returns whether a line
    /// was found.
    pub fn set_item_status(&mut self, product_id: ProductId, status: OrderItemStatus) -> bool {
        match self.items.iter_mut().find(|item| item.product.id == product_id) {
            Some(item) => {
                item.status = status;
                true
            }
            None => false,
        }
    }
}

/// Sort orders newest first.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.date.cmp(&a.date));
}
