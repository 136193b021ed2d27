//! Seller revenue analytics.
//!
//! Computed from orders already filtered to one store, so every figure is
//! that store's share of each order.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::Order;
use crate::types::{Price, ProductId};

/// How many products the top-sellers list shows.
pub const TOP_PRODUCTS: usize = 5;

/// Days covered by the daily sales chart.
pub const SALES_WINDOW_DAYS: i64 = 7;

/// Sales for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySales {
    /// Short weekday label, e.g. `Mon`.
    pub label: String,
    pub total: Price,
}

/// Units sold of one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
}

/// The seller revenue dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueSummary {
    pub total_revenue: Price,
    pub order_count: usize,
    pub average_order_value: Price,
    /// Oldest day first, ending today.
    pub daily_sales: Vec<DailySales>,
    pub top_products: Vec<ProductSales>,
}

impl RevenueSummary {
    /// Summarize store-filtered orders as of `now`.
    #[must_use]
    pub fn compute(store_orders: &[Order], now: DateTime<Utc>) -> Self {
        let total_revenue: Price = store_orders.iter().map(Order::items_total).sum();
        let order_count = store_orders.len();

        let daily_sales = (0..SALES_WINDOW_DAYS)
            .rev()
            .map(|days_ago| {
                let day = (now - Duration::days(days_ago)).date_naive();
                let total = store_orders
                    .iter()
                    .filter(|o| o.date.date_naive() == day)
                    .map(Order::items_total)
                    .sum();
                DailySales {
                    label: day.format("%a").to_string(),
                    total,
                }
            })
            .collect();

        Self {
            total_revenue,
            order_count,
            average_order_value: total_revenue.average_over(order_count),
            daily_sales,
            top_products: top_products(store_orders),
        }
    }

    /// Largest daily total, for scaling the bar chart.
    #[must_use]
    pub fn peak_day(&self) -> Price {
        self.daily_sales
            .iter()
            .map(|d| d.total)
            .max()
            .unwrap_or(Price::ZERO)
    }
}

fn top_products(store_orders: &[Order]) -> Vec<ProductSales> {
    // Vec keeps first-seen order so ties sort stably.
    let mut index: HashMap<ProductId, usize> = HashMap::new();
    let mut sales: Vec<ProductSales> = Vec::new();

    for item in store_orders.iter().flat_map(|o| &o.items) {
        match index.get(&item.product.id) {
            Some(&i) => sales[i].quantity += item.quantity,
            None => {
                index.insert(item.product.id, sales.len());
                sales.push(ProductSales {
                    product_id: item.product.id,
                    name: item.product.name.clone(),
                    image_url: item.product.image_url.clone(),
                    quantity: item.quantity,
                });
            }
        }
    }

    sales.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    sales.truncate(TOP_PRODUCTS);
    sales
}
