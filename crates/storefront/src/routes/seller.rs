//! Seller route handlers.
//!
//! Every page and action here works on the store returned by
//! `Identity::seller_store`, so a seller only ever sees and changes their own
//! store's products and order lines.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use blife_core::analytics::RevenueSummary;
use blife_core::{
    Identity, Order, OrderId, OrderItemStatus, Price, Product, ProductId, ProductInput,
    StoreApplication, StoreCustomization, StoreId, View,
};

use crate::error::{AppError, Result};
use crate::middleware::Viewer;
use crate::models::Flash;
use crate::state::AppState;

use super::chart::{self, ChartBar};
use super::pages::{Page, PageContext, authorize};

const PRODUCTS_PATH: &str = "/seller/products";
const ORDERS_PATH: &str = "/seller/orders";
const SETTINGS_PATH: &str = "/seller/store-settings";

/// Recent orders listed on the seller dashboard.
const RECENT_ORDERS: usize = 5;

/// Product form data, shared by add and edit.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(default)]
    pub name_th: String,
    /// Free text; anything that is not a number becomes zero.
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

impl ProductForm {
    fn into_input(self, store_id: StoreId) -> ProductInput {
        ProductInput {
            store_id,
            name: self.name.trim().to_string(),
            name_th: self.name_th.trim().to_string(),
            price: Price::parse_lenient(&self.price),
            image_url: self.image_url.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

/// Item status form data.
#[derive(Debug, Deserialize)]
pub struct ItemStatusForm {
    pub status: OrderItemStatus,
}

/// Store customization form data.
#[derive(Debug, Deserialize)]
pub struct StoreSettingsForm {
    #[serde(default)]
    pub banner_image_url: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub theme_color: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Seller dashboard template.
#[derive(Template)]
#[template(path = "pages/seller_dashboard.html")]
pub struct SellerDashboardTemplate {
    pub total_revenue: Price,
    pub order_count: usize,
    pub product_count: usize,
    pub recent_orders: Vec<Order>,
}

/// Seller products template.
#[derive(Template)]
#[template(path = "pages/seller_products.html")]
pub struct SellerProductsTemplate {
    pub products: Vec<Product>,
    /// Product being edited, when `?edit=<id>` names one of ours.
    pub editing: Option<Product>,
}

/// Seller orders template.
#[derive(Template)]
#[template(path = "pages/seller_orders.html")]
pub struct SellerOrdersTemplate {
    pub orders: Vec<Order>,
    pub statuses: &'static [OrderItemStatus],
}

/// Seller revenue template.
#[derive(Template)]
#[template(path = "pages/seller_revenue.html")]
pub struct SellerRevenueTemplate {
    pub summary: RevenueSummary,
    pub bars: Vec<ChartBar>,
    pub top_products: Vec<TopProduct>,
}

/// A best seller with its thumbnail.
pub struct TopProduct {
    pub name: String,
    pub thumbnail_url: String,
    pub quantity: u32,
}

/// Store settings template.
#[derive(Template)]
#[template(path = "pages/seller_store_settings.html")]
pub struct StoreSettingsTemplate {
    pub store: StoreApplication,
    pub banner_image_url: String,
    pub profile_image_url: String,
    pub theme_color: String,
}

// =============================================================================
// Pages
// =============================================================================

/// The store managed by the current visitor.
fn managed_store(ctx: &PageContext) -> Result<StoreId> {
    ctx.require_identity()?
        .seller_store()
        .cloned()
        .ok_or_else(|| AppError::Forbidden("not an approved seller".to_string()))
}

/// # Errors
///
/// Returns an error if rendering fails.
pub async fn dashboard(ctx: &PageContext, store_id: &StoreId) -> Result<Page> {
    let orders = ctx.repository().orders_by_store(store_id).await;
    let product_count = ctx.repository().products_by_store(store_id).await.len();
    let total_revenue = orders.iter().map(Order::items_total).sum();

    Page::render(
        "Seller Dashboard",
        &SellerDashboardTemplate {
            total_revenue,
            order_count: orders.len(),
            product_count,
            recent_orders: orders.into_iter().take(RECENT_ORDERS).collect(),
        },
    )
}

/// # Errors
///
/// Returns an error if the visitor manages no store or rendering fails.
pub async fn products(ctx: &PageContext) -> Result<Page> {
    let store_id = managed_store(ctx)?;
    let products = ctx.repository().products_by_store(&store_id).await;
    let editing = ctx
        .param("edit")
        .and_then(|raw| raw.parse::<ProductId>().ok())
        .and_then(|id| products.iter().find(|p| p.id == id).cloned());

    Page::render(
        "Your Products",
        &SellerProductsTemplate { products, editing },
    )
}

/// # Errors
///
/// Returns an error if the visitor manages no store or rendering fails.
pub async fn orders(ctx: &PageContext) -> Result<Page> {
    let store_id = managed_store(ctx)?;
    let orders = ctx.repository().orders_by_store(&store_id).await;

    Page::render(
        "Your Orders",
        &SellerOrdersTemplate {
            orders,
            statuses: OrderItemStatus::ALL,
        },
    )
}

/// # Errors
///
/// Returns an error if the visitor manages no store or rendering fails.
pub async fn revenue(ctx: &PageContext) -> Result<Page> {
    let store_id = managed_store(ctx)?;
    let orders = ctx.repository().orders_by_store(&store_id).await;
    let summary = RevenueSummary::compute(&orders, Utc::now());

    // Thumbnails come from the catalog entry when it still exists.
    let catalog = ctx.repository().products_by_store(&store_id).await;
    let top_products = summary
        .top_products
        .iter()
        .map(|sold| TopProduct {
            name: sold.name.clone(),
            thumbnail_url: catalog
                .iter()
                .find(|p| p.id == sold.product_id)
                .map_or_else(|| sold.image_url.clone(), |p| p.thumbnail_url(64)),
            quantity: sold.quantity,
        })
        .collect();

    Page::render(
        "Revenue & Analytics",
        &SellerRevenueTemplate {
            bars: chart::bars(&summary),
            top_products,
            summary,
        },
    )
}

/// # Errors
///
/// Returns an error if the visitor manages no store or rendering fails.
pub async fn store_settings(ctx: &PageContext) -> Result<Page> {
    let store_id = managed_store(ctx)?;
    let Some(store) = ctx.repository().store(&store_id).await else {
        return Page::not_found(
            "Store Not Found",
            "Your store application could not be found.",
        );
    };

    Page::render(
        "Store Customization",
        &StoreSettingsTemplate {
            banner_image_url: store.banner_image_url.clone().unwrap_or_default(),
            profile_image_url: store.profile_image_url.clone().unwrap_or_default(),
            theme_color: store.theme_or_default().to_string(),
            store,
        },
    )
}

// =============================================================================
// Actions
// =============================================================================

/// Check the viewer may use the seller page at `path` and return their store.
fn seller_store_for(viewer: &Viewer, path: &str, view: &View) -> Result<StoreId> {
    authorize(viewer, path, view)?;
    viewer
        .identity()
        .and_then(Identity::seller_store)
        .cloned()
        .ok_or_else(|| AppError::Forbidden("not an approved seller".to_string()))
}

/// Load one of the seller's own products.
async fn own_product(state: &AppState, store_id: &StoreId, id: ProductId) -> Result<Product> {
    match state.repository().product(id).await {
        Some(product) if &product.store_id == store_id => Ok(product),
        Some(_) => Err(AppError::Forbidden(format!(
            "product {id} belongs to another store"
        ))),
        None => Err(AppError::NotFound(format!("product {id}"))),
    }
}

/// Add a product to the seller's store.
#[instrument(skip(state, viewer, form))]
pub async fn add_product(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let store_id = seller_store_for(&viewer, PRODUCTS_PATH, &View::SellerProducts)?;
    if form.name.trim().is_empty() {
        viewer.flash(Flash::error("Product name is required.")).await?;
        return Ok(Redirect::to(PRODUCTS_PATH).into_response());
    }

    let product = state
        .repository()
        .add_product(form.into_input(store_id))
        .await;
    tracing::info!(product_id = %product.id, "Product added");
    viewer
        .flash(Flash::success(format!("Product '{}' added.", product.name)))
        .await?;
    Ok(Redirect::to(PRODUCTS_PATH).into_response())
}

/// Replace one of the seller's products.
#[instrument(skip(state, viewer, form))]
pub async fn update_product(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let store_id = seller_store_for(&viewer, PRODUCTS_PATH, &View::SellerProducts)?;
    let existing = own_product(&state, &store_id, ProductId::new(id)).await?;
    if form.name.trim().is_empty() {
        viewer.flash(Flash::error("Product name is required.")).await?;
        return Ok(Redirect::to(&format!("{PRODUCTS_PATH}?edit={id}")).into_response());
    }

    let product = state
        .repository()
        .update_product(form.into_input(store_id).with_id(existing.id))
        .await?;
    viewer
        .flash(Flash::success(format!("Product '{}' updated.", product.name)))
        .await?;
    Ok(Redirect::to(PRODUCTS_PATH).into_response())
}

/// Delete one of the seller's products. Orders keep their snapshots.
#[instrument(skip(state, viewer))]
pub async fn delete_product(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<i64>,
) -> Result<Response> {
    let store_id = seller_store_for(&viewer, PRODUCTS_PATH, &View::SellerProducts)?;
    let existing = own_product(&state, &store_id, ProductId::new(id)).await?;

    let product = state.repository().delete_product(existing.id).await?;
    viewer
        .flash(Flash::success(format!("Product '{}' deleted.", product.name)))
        .await?;
    Ok(Redirect::to(PRODUCTS_PATH).into_response())
}

/// Move one of the seller's order lines to a new fulfillment status.
#[instrument(skip(state, viewer, form), fields(status = %form.status))]
pub async fn update_item_status(
    State(state): State<AppState>,
    viewer: Viewer,
    Path((order_id, product_id)): Path<(String, i64)>,
    Form(form): Form<ItemStatusForm>,
) -> Result<Response> {
    let store_id = seller_store_for(&viewer, ORDERS_PATH, &View::SellerOrders)?;
    let order_id = OrderId::new(order_id);
    let product_id = ProductId::new(product_id);

    let owns_line = state
        .repository()
        .order(&order_id)
        .await
        .and_then(|order| order.for_store(&store_id))
        .is_some_and(|order| order.contains_product(product_id));
    if !owns_line {
        return Err(AppError::NotFound(format!(
            "order {order_id} has no line for product {product_id} in this store"
        )));
    }

    state
        .repository()
        .update_order_item_status(&order_id, product_id, form.status)
        .await?;
    tracing::info!(%order_id, %product_id, "Order item status updated");
    viewer
        .flash(Flash::success(format!(
            "Order {order_id} updated to {}.",
            form.status
        )))
        .await?;
    Ok(Redirect::to(ORDERS_PATH).into_response())
}

/// Save the seller's store customization.
#[instrument(skip(state, viewer, form))]
pub async fn save_store_settings(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<StoreSettingsForm>,
) -> Result<Response> {
    let store_id = seller_store_for(&viewer, SETTINGS_PATH, &View::SellerStoreSettings)?;

    let customization = StoreCustomization {
        banner_image_url: form.banner_image_url.trim().to_string(),
        profile_image_url: form.profile_image_url.trim().to_string(),
        theme_color: form.theme_color.trim().to_string(),
    };
    state
        .repository()
        .update_store_customization(&store_id, customization)
        .await?;
    viewer
        .flash(Flash::success("Changes saved successfully!"))
        .await?;
    Ok(Redirect::to(SETTINGS_PATH).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_form_coerces_bad_price_to_zero() {
        let form = ProductForm {
            name: "  Kale Chips ".to_string(),
            name_th: String::new(),
            price: "abc".to_string(),
            image_url: String::new(),
            description: String::new(),
        };
        let input = form.into_input(StoreId::new("STORE-MOCK-123"));
        assert_eq!(input.name, "Kale Chips");
        assert_eq!(input.price, Price::ZERO);
    }
}
