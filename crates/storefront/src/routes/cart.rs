//! Cart route handlers.
//!
//! The cart lives in the visitor's session, signed in or not. Every action
//! redirects back to the page the form was posted from.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use blife_core::ProductId;

use crate::error::{Result, breadcrumb};
use crate::middleware::Viewer;
use crate::models::Flash;
use crate::state::AppState;

use super::redirect_back;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub return_to: String,
}

/// Update cart form data. Zero or a negative quantity removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(default)]
    pub return_to: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub return_to: String,
}

/// Add one of a product to the cart.
#[instrument(skip(state, viewer, form), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let Some(product) = state.repository().product(form.product_id).await else {
        viewer.flash(Flash::error("That product is no longer available.")).await?;
        return Ok(redirect_back(&form.return_to).into_response());
    };

    let mut cart = viewer.cart().await;
    let message = format!("Added {} to your cart.", product.name);
    cart.add(product);
    viewer.save_cart(&cart).await?;
    viewer.flash(Flash::success(message)).await?;

    let product_id = form.product_id.to_string();
    breadcrumb("cart", "Added product", &[("product_id", product_id.as_str())]);
    Ok(redirect_back(&form.return_to).into_response())
}

/// Set a line's quantity.
#[instrument(skip(viewer, form), fields(product_id = %form.product_id, quantity = form.quantity))]
pub async fn update(viewer: Viewer, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let mut cart = viewer.cart().await;
    cart.set_quantity(form.product_id, form.quantity);
    viewer.save_cart(&cart).await?;
    Ok(redirect_back(&form.return_to).into_response())
}

/// Remove a line.
#[instrument(skip(viewer, form), fields(product_id = %form.product_id))]
pub async fn remove(viewer: Viewer, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut cart = viewer.cart().await;
    cart.remove(form.product_id);
    viewer.save_cart(&cart).await?;
    Ok(redirect_back(&form.return_to).into_response())
}
