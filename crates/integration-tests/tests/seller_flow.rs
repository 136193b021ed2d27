//! Integration tests for the seller console.

#![allow(clippy::unwrap_used)]

use blife_core::{Price, ProductInput, StoreId, UserRole};
use blife_integration_tests::{TestContext, body};

/// The order ID in the first item status form on the seller orders page.
fn first_order_id(html: &str) -> Option<&str> {
    let start = html.find(r#"action="/seller/orders/"#)? + r#"action="/seller/orders/"#.len();
    let rest = html.get(start..)?;
    rest.get(..rest.find("/items/")?)
}

#[tokio::test]
async fn test_seller_login_opens_console() {
    let ctx = TestContext::new().await;

    let response = ctx.login("seller@example.com", UserRole::Seller).await;
    assert_eq!(response.url().path(), "/dashboard");
    let html = body(response).await;
    assert!(html.contains("Seller Dashboard"));
    assert!(html.contains("/store/STORE-MOCK-123"));
}

#[tokio::test]
async fn test_seller_manages_products() {
    let ctx = TestContext::new().await;
    ctx.login("seller@example.com", UserRole::Seller).await;

    let html = body(ctx.get("/seller/products").await).await;
    assert!(html.contains("Your Products"));
    assert!(html.contains("Organic Whey Protein"));

    let response = ctx
        .post(
            "/seller/products",
            &[
                ("name", "Matcha Latte Mix"),
                ("name_th", "มัทฉะลาเต้"),
                ("price", "420"),
                ("image_url", "https://example.com/matcha.jpg"),
                ("description", "Ceremonial grade"),
            ],
        )
        .await;
    assert_eq!(response.url().path(), "/seller/products");
    let html = body(response).await;
    assert!(html.contains("Matcha Latte Mix"));
    assert!(html.contains("฿420"));

    let store = body(ctx.get("/store/STORE-MOCK-123").await).await;
    assert!(store.contains("Healthy Habits Co."));
    assert!(store.contains("Matcha Latte Mix"));
}

#[tokio::test]
async fn test_seller_console_hides_other_stores_products() {
    let ctx = TestContext::new().await;
    ctx.seed_product(ProductInput {
        store_id: StoreId::new("STORE-PENDING-456"),
        name: "Sprouted Lentil Crackers".to_string(),
        name_th: String::new(),
        price: Price::baht(135),
        image_url: "https://example.com/crackers.jpg".to_string(),
        description: "Baked, not fried".to_string(),
    })
    .await;
    ctx.login("seller@example.com", UserRole::Seller).await;

    let console = body(ctx.get("/seller/products").await).await;
    assert!(console.contains("Organic Whey Protein"));
    assert!(!console.contains("Sprouted Lentil Crackers"));

    let revenue = body(ctx.get("/seller/revenue").await).await;
    assert!(!revenue.contains("Sprouted Lentil Crackers"));

    let store = body(ctx.get("/store/STORE-PENDING-456").await).await;
    assert!(store.contains("Green Goodness"));
    assert!(store.contains("Sprouted Lentil Crackers"));
    assert!(!store.contains("Organic Whey Protein"));
}

#[tokio::test]
async fn test_seller_customizes_store() {
    let ctx = TestContext::new().await;
    ctx.login("seller@example.com", UserRole::Seller).await;

    let response = ctx
        .post(
            "/seller/store-settings",
            &[
                ("banner_image_url", "https://example.com/banner.jpg"),
                ("profile_image_url", ""),
                ("theme_color", "#123456"),
            ],
        )
        .await;
    assert!(body(response).await.contains("Changes saved successfully!"));

    let store = body(ctx.get("/store/STORE-MOCK-123").await).await;
    assert!(store.contains("#123456"));
    assert!(store.contains("https://example.com/banner.jpg"));
}

#[tokio::test]
async fn test_seller_ships_customer_order() {
    let ctx = TestContext::new().await;

    let customer = TestContext::client();
    let customer_post = |path: &'static str, form: &'static [(&'static str, &'static str)]| {
        customer.post(ctx.url(path)).form(form).send()
    };
    customer_post("/login", &[("email", "buyer@example.com"), ("role", "CUSTOMER")])
        .await
        .unwrap();
    customer_post("/cart/add", &[("product_id", "1"), ("return_to", "/products")])
        .await
        .unwrap();
    customer_post("/checkout", &[]).await.unwrap();

    ctx.login("seller@example.com", UserRole::Seller).await;
    let orders = body(ctx.get("/seller/orders").await).await;
    let order_id = first_order_id(&orders).unwrap().to_string();
    assert!(order_id.starts_with("BLIFE-"));

    let response = ctx
        .post(
            &format!("/seller/orders/{order_id}/items/1"),
            &[("status", "Shipped")],
        )
        .await;
    assert_eq!(response.url().path(), "/seller/orders");

    let profile = customer
        .get(ctx.url("/profile"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(profile.contains("Shipped"));
}

#[tokio::test]
async fn test_pending_seller_is_refused() {
    let ctx = TestContext::new().await;
    ctx.login("hopeful@example.com", UserRole::Customer).await;

    let response = ctx
        .post(
            "/seller-registration",
            &[("store_name", "Sunrise Snacks"), ("store_description", "Granola")],
        )
        .await;
    assert_eq!(response.url().path(), "/dashboard");
    assert!(body(response).await.contains("currently under review"));

    let html = body(ctx.get("/seller/products").await).await;
    assert!(html.contains("Permission Denied"));

    let refused = ctx
        .post("/seller/products", &[("name", "Sneaky"), ("price", "1")])
        .await;
    assert_eq!(refused.status(), 403);
}
