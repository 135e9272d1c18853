//! Integration tests for the admin dashboard.

use axum::http::StatusCode;
use tokoku_integration_tests::TestApp;

async fn admin_app() -> TestApp {
    let mut app = TestApp::new().await;
    app.login("admin@example.com", "admin123").await;
    app
}

#[tokio::test]
async fn test_anonymous_visitors_are_sent_to_login() {
    let mut app = TestApp::new().await;
    let response = app.get("/dashboard?tab=orders").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login?next=/dashboard"));
}

#[tokio::test]
async fn test_customers_are_forbidden() {
    let mut app = TestApp::new().await;
    app.login("user@example.com", "user123").await;

    assert_eq!(app.get("/dashboard").await.status, StatusCode::FORBIDDEN);
    let response = app
        .post("/dashboard/orders/1/status", &[("status", "cancelled")])
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_overview() {
    let mut app = admin_app().await;
    let response = app.get("/dashboard").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Admin dashboard"));
    assert!(response.body.contains("+12.5%"));
    assert!(response.body.contains("Sales, last 7 days"));
    assert!(response.body.contains("value=\"100\""), "busiest day fills its bar");
    assert!(response.body.contains("href=\"/dashboard\""), "admins see the nav link");
}

#[tokio::test]
async fn test_order_status_update() {
    let mut app = admin_app().await;
    let before = app.get("/dashboard?tab=orders&status=cancelled").await;
    assert!(before.body.contains("No orders with this status."));

    let response = app
        .post(
            "/dashboard/orders/2/status",
            &[("status", "cancelled"), ("return_to", "/dashboard?tab=orders&status=cancelled")],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/dashboard?tab=orders&status=cancelled"));

    let after = app.get("/dashboard?tab=orders&status=cancelled").await;
    assert!(!after.body.contains("No orders with this status."));
    assert!(after.body.contains("<td>2</td>"));
}

#[tokio::test]
async fn test_order_status_errors() {
    let mut app = admin_app().await;
    let response = app
        .post("/dashboard/orders/2/status", &[("status", "lost")])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .post("/dashboard/orders/999/status", &[("status", "shipped")])
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_role_update() {
    let mut app = admin_app().await;
    let admins = app.get("/dashboard?tab=users&role=admin").await;
    assert!(admins.body.contains("admin_user"));
    assert!(!admins.body.contains("john_doe"));

    let response = app
        .post("/dashboard/users/user1/role", &[("role", "admin")])
        .await;
    assert_eq!(response.location(), Some("/dashboard?tab=users"));

    let admins = app.get("/dashboard?tab=users&role=admin").await;
    assert!(admins.body.contains("john_doe"));

    let search = app.get("/dashboard?tab=users&q=jane").await;
    assert!(search.body.contains("jane_smith"));
    assert!(!search.body.contains("john_doe"));
}

#[tokio::test]
async fn test_invalid_product_is_rejected() {
    let mut app = admin_app().await;
    let response = app
        .post(
            "/dashboard/products",
            &[("title", ""), ("price", "cheap"), ("category", "toys")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Title is required"));
    assert!(response.body.contains("Price must be a number"));
    assert!(response.body.contains("value=\"cheap\""), "input is kept");
}

#[tokio::test]
async fn test_product_lifecycle() {
    let mut app = admin_app().await;
    let draft = [
        ("title", "Noise Cancelling Headphones"),
        ("price", "149.5"),
        ("category", "electronics"),
        ("image", "https://example.com/headphones.png"),
        ("description", "Over-ear, 30 hour battery"),
    ];

    let response = app.post("/dashboard/products", &draft).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/dashboard?tab=products"));

    let page = app.get("/products/10000").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Noise Cancelling Headphones"));
    assert!(page.body.contains("$149.50"));

    let listing = app.get("/products?category=electronics").await;
    assert!(listing.body.contains("Noise Cancelling Headphones"));

    let renamed = draft.map(|(key, value)| {
        (key, if key == "title" { "Studio Headphones" } else { value })
    });
    let response = app.post("/dashboard/products/10000", &renamed).await;
    assert_eq!(response.location(), Some("/dashboard?tab=products"));
    assert!(app.get("/products/10000").await.body.contains("Studio Headphones"));

    let response = app.post("/dashboard/products/10000/delete", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(app.get("/products/10000").await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.post("/dashboard/products/10000/delete", &[]).await.status,
        StatusCode::NOT_FOUND
    );
}
