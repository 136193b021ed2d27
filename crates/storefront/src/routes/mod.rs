//! HTTP route handlers for the storefront.
//!
//! Every `GET` goes through [`pages::show`], which asks the view resolver
//! what the current visitor may see at that path. Actions are `POST`
//! handlers that change state and redirect back (post/redirect/get).
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                  - Health check
//! GET  /*                                       - Resolver-rendered page
//!
//! # Auth
//! POST /login                                   - Mock login (email + role)
//! POST /register                                - Register as customer
//! POST /logout                                  - Logout (cart is kept)
//!
//! # Cart
//! POST /cart/add                                - Add product
//! POST /cart/update                             - Set quantity (<= 0 removes)
//! POST /cart/remove                             - Remove line
//! POST /checkout                                - Place order
//!
//! # Catalog
//! POST /products/{id}/reviews                   - Leave a review
//!
//! # Account
//! POST /seller-registration                     - Submit store application
//!
//! # Seller (approved sellers)
//! POST /seller/products                         - Add product
//! POST /seller/products/{id}                    - Update product
//! POST /seller/products/{id}/delete             - Delete product
//! POST /seller/orders/{order_id}/items/{product_id} - Set item status
//! POST /seller/store-settings                   - Save customization
//!
//! # Admin
//! POST /admin/management/stores/{id}            - Set store status
//! POST /admin/management/users/{id}             - Edit role / seller status
//! POST /admin/commissions/payout                - Pay out selected
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod chart;
pub mod checkout;
pub mod layout;
pub mod pages;
pub mod seller;

use axum::{
    Router,
    handler::Handler,
    response::Redirect,
    routing::{MethodRouter, get, post},
};

use crate::state::AppState;

/// Where cart actions send the visitor when `return_to` is unusable.
const DEFAULT_RETURN_PATH: &str = "/products";

/// A path that renders a page on `GET` and runs `handler` on `POST`.
fn action<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(pages::show).post(handler)
}

/// Redirect to a same-site path taken from a form, never off-site.
///
/// Browsers read `//host` and `/\host` as scheme-relative URLs, so a second
/// slash or backslash is rejected.
pub(crate) fn redirect_back(return_to: &str) -> Redirect {
    let return_to = return_to.trim();
    let mut chars = return_to.chars();
    let same_site = chars.next() == Some('/') && !matches!(chars.next(), Some('/' | '\\'));
    if same_site {
        Redirect::to(return_to)
    } else {
        Redirect::to(DEFAULT_RETURN_PATH)
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", action(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the seller routes router.
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/products", action(seller::add_product))
        .route("/products/{id}", post(seller::update_product))
        .route("/products/{id}/delete", post(seller::delete_product))
        .route(
            "/orders/{order_id}/items/{product_id}",
            post(seller::update_item_status),
        )
        .route("/store-settings", action(seller::save_store_settings))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/management/stores/{id}",
            post(admin::update_store_status),
        )
        .route("/management/users/{id}", post(admin::update_user))
        .route("/commissions/payout", post(admin::payout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", action(checkout::place_order))
        .route("/products/{id}/reviews", post(catalog::submit_review))
        .route(
            "/seller-registration",
            action(account::submit_seller_registration),
        )
        .nest("/seller", seller_routes())
        .nest("/admin", admin_routes())
        // Everything else is a page
        .fallback(pages::show)
}

#[cfg(test)]
mod tests {
    use axum::{http::header::LOCATION, response::IntoResponse};

    use super::*;

    fn location(redirect: Redirect) -> String {
        redirect
            .into_response()
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_redirect_back_stays_on_site() {
        assert_eq!(location(redirect_back("/products/3")), "/products/3");
        assert_eq!(location(redirect_back("//evil.example")), "/products");
        assert_eq!(location(redirect_back("https://evil.example")), "/products");
        assert_eq!(location(redirect_back("")), "/products");
        assert_eq!(location(redirect_back("/")), "/");
    }

    #[test]
    fn test_redirect_back_rejects_backslash_host() {
        assert_eq!(location(redirect_back("/\\evil.example")), "/products");
        assert_eq!(location(redirect_back(" /\\evil.example/x")), "/products");
        assert_eq!(location(redirect_back("/store/a\\b")), "/store/a\\b");
    }
}
