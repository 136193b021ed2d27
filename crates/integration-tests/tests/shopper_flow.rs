//! Integration tests for the shopper journey: catalog, cart, checkout and
//! reviews.

use blife_core::UserRole;
use blife_integration_tests::{TestContext, body};

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_catalog_is_public() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/products").await;
    assert_eq!(response.status(), 200);
    let html = body(response).await;
    assert!(html.contains("Organic Whey Protein"));
    assert!(html.contains("฿1,890"));
    assert!(html.contains("Login"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/products/424242").await;
    assert_eq!(response.status(), 404);
    assert!(body(response).await.contains("Product Not Found"));
}

// =============================================================================
// Cart and checkout
// =============================================================================

#[tokio::test]
async fn test_add_same_product_twice_merges_lines() {
    let ctx = TestContext::new().await;

    let form = [("product_id", "1"), ("return_to", "/products")];
    ctx.post("/cart/add", &form).await;
    let response = ctx.post("/cart/add", &form).await;

    assert_eq!(response.url().path(), "/products");
    let html = body(response).await;
    assert!(html.contains("Added Organic Whey Protein to your cart."));
    // One line, quantity 2, subtotal 2 x 1,890
    assert!(html.contains(r#"name="quantity" value="2""#));
    assert!(html.contains("฿3,780"));
}

#[tokio::test]
async fn test_quantity_zero_removes_line() {
    let ctx = TestContext::new().await;

    ctx.post("/cart/add", &[("product_id", "1"), ("return_to", "/products")])
        .await;
    let response = ctx
        .post(
            "/cart/update",
            &[("product_id", "1"), ("quantity", "0"), ("return_to", "/products")],
        )
        .await;

    assert!(body(response).await.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_checkout_places_order() {
    let ctx = TestContext::new().await;
    ctx.login("customer@example.com", UserRole::Customer).await;

    ctx.post("/cart/add", &[("product_id", "1"), ("return_to", "/products")])
        .await;
    ctx.post("/cart/add", &[("product_id", "2"), ("return_to", "/products")])
        .await;

    let checkout = body(ctx.get("/checkout").await).await;
    assert!(checkout.contains("฿2,740"));
    assert!(checkout.contains("customer@example.com"));

    let response = ctx.post("/checkout", &[]).await;
    assert_eq!(response.url().path(), "/order-confirmation");
    let html = body(response).await;
    assert!(html.contains("Thank you for your order!"));
    assert!(html.contains("฿2,740"));
    assert!(html.contains("Your cart is empty."));

    let profile = body(ctx.get("/profile").await).await;
    assert!(profile.contains("Organic Whey Protein"));
    assert!(profile.contains("Processing"));
}

#[tokio::test]
async fn test_checkout_with_empty_cart_is_refused() {
    let ctx = TestContext::new().await;
    ctx.login("customer@example.com", UserRole::Customer).await;

    let response = ctx.post("/checkout", &[]).await;
    assert_eq!(response.url().path(), "/checkout");
    assert!(body(response).await.contains("Your Cart is Empty"));
}

#[tokio::test]
async fn test_cart_survives_logout() {
    let ctx = TestContext::new().await;
    ctx.login("customer@example.com", UserRole::Customer).await;
    ctx.post("/cart/add", &[("product_id", "3"), ("return_to", "/products")])
        .await;

    ctx.post("/logout", &[]).await;

    let html = body(ctx.get("/products").await).await;
    assert!(html.contains(r#"name="quantity" value="1""#));
}

// =============================================================================
// Reviews
// =============================================================================

#[tokio::test]
async fn test_review_requires_purchase() {
    let ctx = TestContext::new().await;
    ctx.login("shopper@example.com", UserRole::Customer).await;

    let detail = body(ctx.get("/products/4").await).await;
    assert!(detail.contains("You must purchase this item to leave a review."));

    let response = ctx
        .post("/products/4/reviews", &[("rating", "5"), ("comment", "Lovely")])
        .await;
    let html = body(response).await;
    assert!(html.contains("You must purchase this item to leave a review."));
    assert!(!html.contains("Lovely"));
}

#[tokio::test]
async fn test_review_after_purchase() {
    let ctx = TestContext::new().await;
    ctx.login("shopper@example.com", UserRole::Customer).await;
    ctx.post("/cart/add", &[("product_id", "4"), ("return_to", "/products")])
        .await;
    ctx.post("/checkout", &[]).await;

    let response = ctx
        .post(
            "/products/4/reviews",
            &[("rating", "4"), ("comment", "Fresh and crunchy")],
        )
        .await;

    assert_eq!(response.url().path(), "/products/4");
    let html = body(response).await;
    assert!(html.contains("Review submitted!"));
    assert!(html.contains("Fresh and crunchy"));
    assert!(html.contains("★★★★☆"));
}
