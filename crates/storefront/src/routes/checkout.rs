//! Checkout and order confirmation.
//!
//! Shipping and payment fields are collected for show only; placing the
//! order turns the session cart into a persisted order.

use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use blife_core::{CartItem, Order, Price, View};

use crate::error::{Result, breadcrumb};
use crate::middleware::Viewer;
use crate::models::Flash;
use crate::state::AppState;

use super::pages::{Page, PageContext, authorize};

const CHECKOUT_PATH: &str = "/checkout";

/// Checkout page template.
#[derive(Template)]
#[template(path = "pages/checkout.html")]
pub struct CheckoutTemplate {
    pub items: Vec<CartItem>,
    pub subtotal: Price,
    pub email: String,
}

/// Order confirmation page template.
#[derive(Template)]
#[template(path = "pages/order_confirmation.html")]
pub struct ConfirmationTemplate {
    pub order: Option<Order>,
}

/// # Errors
///
/// Returns an error if the template fails to render.
pub async fn checkout_page(ctx: &PageContext) -> Result<Page> {
    let cart = ctx.viewer.cart().await;
    let email = ctx
        .identity()
        .map(|identity| identity.email.to_string())
        .unwrap_or_default();

    Page::render(
        "Checkout",
        &CheckoutTemplate {
            subtotal: cart.subtotal(),
            items: cart.items().to_vec(),
            email,
        },
    )
}

/// # Errors
///
/// Returns an error if the template fails to render.
pub async fn confirmation_page(ctx: &PageContext) -> Result<Page> {
    let order = match ctx.viewer.last_order().await {
        Some(id) => ctx.repository().order(&id).await,
        None => None,
    };
    Page::render("Order Confirmed", &ConfirmationTemplate { order })
}

/// Place an order for everything in the cart.
#[instrument(skip(state, viewer))]
pub async fn place_order(State(state): State<AppState>, viewer: Viewer) -> Result<Response> {
    authorize(&viewer, CHECKOUT_PATH, &View::Checkout)?;
    let Some(identity) = viewer.identity() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let mut cart = viewer.cart().await;
    if cart.is_empty() {
        viewer.flash(Flash::error("Your Cart is Empty")).await?;
        return Ok(Redirect::to(CHECKOUT_PATH).into_response());
    }

    let order = state
        .repository()
        .create_order(cart.take_items(), &identity.id)
        .await;
    viewer.save_cart(&cart).await?;
    viewer.set_last_order(&order.id).await?;

    breadcrumb("checkout", "Order placed", &[("order_id", order.id.as_str())]);
    tracing::info!(order_id = %order.id, total = %order.total, "Order placed");
    Ok(Redirect::to("/order-confirmation").into_response())
}
