//! Product catalog, product detail, store pages and reviews.

use std::collections::HashMap;

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use blife_core::models::store::initials_avatar_url;
use blife_core::{
    Identity, NewReview, Product, ProductId, Review, StoreApplication, StoreId, View,
    average_rating,
};

use crate::error::Result;
use crate::filters;
use crate::middleware::Viewer;
use crate::models::Flash;
use crate::repository::Repository;
use crate::state::AppState;

use super::pages::{Page, PageContext, authorize};

/// A product with the name of the store selling it.
pub struct ProductCard {
    pub product: Product,
    pub store_name: String,
}

/// Review form data.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Product catalog template.
#[derive(Template)]
#[template(path = "pages/catalog.html")]
pub struct CatalogTemplate {
    pub cards: Vec<ProductCard>,
    pub return_to: String,
}

/// Product detail template.
#[derive(Template)]
#[template(path = "pages/product_detail.html")]
pub struct ProductDetailTemplate {
    pub product: Product,
    pub store: Option<StoreApplication>,
    pub reviews: Vec<Review>,
    /// Average rating to one decimal, absent without reviews.
    pub average: Option<String>,
    pub signed_in: bool,
    pub can_review: bool,
    pub return_to: String,
}

/// Store page template.
#[derive(Template)]
#[template(path = "pages/store.html")]
pub struct StoreTemplate {
    pub store: StoreApplication,
    pub banner_url: String,
    pub profile_url: String,
    pub theme_color: String,
    pub products: Vec<Product>,
    pub return_to: String,
}

// =============================================================================
// Pages
// =============================================================================

async fn store_names(repository: &Repository) -> HashMap<StoreId, String> {
    repository
        .store_applications()
        .await
        .into_iter()
        .map(|store| (store.store_id, store.store_name))
        .collect()
}

/// # Errors
///
/// Returns an error if the template fails to render.
pub async fn catalog(ctx: &PageContext) -> Result<Page> {
    let names = store_names(ctx.repository()).await;
    let cards = ctx
        .repository()
        .products()
        .await
        .into_iter()
        .map(|product| ProductCard {
            store_name: names
                .get(&product.store_id)
                .cloned()
                .unwrap_or_else(|| product.store_id.to_string()),
            product,
        })
        .collect();

    Page::render(
        "Our Healthy Products",
        &CatalogTemplate {
            cards,
            return_to: ctx.path.clone(),
        },
    )
}

/// Whether `identity` has an order containing `product_id`.
async fn has_purchased(repository: &Repository, identity: &Identity, product_id: ProductId) -> bool {
    repository
        .orders_by_user(&identity.id)
        .await
        .iter()
        .any(|order| order.contains_product(product_id))
}

/// # Errors
///
/// Returns an error if the template fails to render.
pub async fn product_detail(ctx: &PageContext, raw_id: &str) -> Result<Page> {
    let product = match raw_id.parse::<ProductId>() {
        Ok(id) => ctx.repository().product(id).await,
        Err(_) => None,
    };
    let Some(product) = product else {
        return Page::not_found(
            "Product Not Found",
            "The product you are looking for does not exist.",
        );
    };

    let reviews = ctx.repository().reviews_for_product(product.id).await;
    let average = average_rating(&reviews).map(|avg| format!("{avg:.1}"));
    let can_review = match ctx.identity() {
        Some(identity) => has_purchased(ctx.repository(), identity, product.id).await,
        None => false,
    };
    let store = ctx.repository().store(&product.store_id).await;

    Page::render(
        product.name.clone(),
        &ProductDetailTemplate {
            store,
            reviews,
            average,
            signed_in: ctx.identity().is_some(),
            can_review,
            return_to: ctx.path.clone(),
            product,
        },
    )
}

/// # Errors
///
/// Returns an error if the template fails to render.
pub async fn store_page(ctx: &PageContext, store_id: &StoreId) -> Result<Page> {
    let Some(store) = ctx.repository().store(store_id).await else {
        return Page::not_found(
            "Store Not Found",
            "The store you are looking for does not exist.",
        );
    };

    let products = ctx.repository().products_by_store(store_id).await;
    let profile_url = store
        .profile_image_url
        .clone()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| initials_avatar_url(&store.store_name));

    Page::render(
        store.store_name.clone(),
        &StoreTemplate {
            banner_url: store.banner_or_default().to_string(),
            theme_color: store.theme_or_default().to_string(),
            profile_url,
            products,
            return_to: ctx.path.clone(),
            store,
        },
    )
}

// =============================================================================
// Actions
// =============================================================================

/// Leave a review. Only customers who have ordered the product may review it.
#[instrument(skip(state, viewer, form))]
pub async fn submit_review(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<i64>,
    Form(form): Form<ReviewForm>,
) -> Result<Response> {
    let product_id = ProductId::new(id);
    let product_path = format!("/products/{product_id}");
    authorize(
        &viewer,
        &product_path,
        &View::ProductDetail(product_id.to_string()),
    )?;

    let Some(identity) = viewer.identity() else {
        viewer
            .flash(Flash::error("Please log in to leave a review."))
            .await?;
        return Ok(Redirect::to("/login").into_response());
    };

    if !has_purchased(state.repository(), identity, product_id).await {
        viewer
            .flash(Flash::error("You must purchase this item to leave a review."))
            .await?;
        return Ok(Redirect::to(&product_path).into_response());
    }

    let review = NewReview {
        product_id,
        rating: form.rating,
        comment: form.comment.trim().to_string(),
    };
    if let Err(e) = review.validate() {
        viewer.flash(Flash::error(e.to_string())).await?;
        return Ok(Redirect::to(&product_path).into_response());
    }

    let review = state.repository().add_review(review, identity).await;
    tracing::info!(review_id = %review.id, rating = review.rating, "Review submitted");
    viewer.flash(Flash::success("Review submitted!")).await?;
    Ok(Redirect::to(&product_path).into_response())
}
