//! Integration tests for resolver-driven access control.

use blife_core::UserRole;
use blife_integration_tests::{TestContext, body};

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let response = ctx.get("/health").await;
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body(response).await, "ok");
}

#[tokio::test]
async fn test_visitors_land_on_home_page() {
    let ctx = TestContext::new().await;

    for path in ["/dashboard", "/checkout", "/admin/logs", "/nowhere"] {
        let response = ctx.get(path).await;
        assert_eq!(response.url().path(), "/", "{path}");
    }
}

#[tokio::test]
async fn test_signed_in_login_goes_to_dashboard() {
    let ctx = TestContext::new().await;
    ctx.login("customer@example.com", UserRole::Customer).await;

    let response = ctx.get("/login").await;
    assert_eq!(response.url().path(), "/dashboard");
    assert!(body(response).await.contains("Your Dashboard"));
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx.post("/login", &[("email", "not an email"), ("role", "CUSTOMER")]).await;
    assert_eq!(response.url().path(), "/login");
}

#[tokio::test]
async fn test_customer_cannot_open_admin_pages() {
    let ctx = TestContext::new().await;
    ctx.login("customer@example.com", UserRole::Customer).await;

    let response = ctx.get("/admin/commissions").await;
    assert_eq!(response.url().path(), "/dashboard");

    let refused = ctx
        .post("/admin/commissions/payout", &[("ids", "COM-003")])
        .await;
    assert_eq!(refused.status(), 403);
}

#[tokio::test]
async fn test_static_stylesheet() {
    let ctx = TestContext::new().await;
    let response = ctx.get("/static/css/main.css").await;
    assert_eq!(response.status(), 200);
}
