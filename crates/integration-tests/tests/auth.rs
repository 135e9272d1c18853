//! Integration tests for demo logins.

use axum::http::StatusCode;
use tokoku_integration_tests::TestApp;

#[tokio::test]
async fn test_login_page_lists_demo_accounts() {
    let mut app = TestApp::new().await;
    let response = app.get("/login").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("user@example.com"));
    assert!(response.body.contains("admin123"));
}

#[tokio::test]
async fn test_login_success_redirects() {
    let mut app = TestApp::new().await;
    let response = app
        .post(
            "/login",
            &[("email", "user@example.com"), ("password", "user123")],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/products"));

    let body = app.get("/products").await.body;
    assert!(body.contains("Hi, user"));
    assert!(!body.contains("href=\"/dashboard\""), "customers see no dashboard link");
}

#[tokio::test]
async fn test_login_honours_next() {
    let mut app = TestApp::new().await;
    let response = app
        .post(
            "/login",
            &[
                ("email", "admin@example.com"),
                ("password", "admin123"),
                ("next", "/dashboard"),
            ],
        )
        .await;
    assert_eq!(response.location(), Some("/dashboard"));
}

#[tokio::test]
async fn test_login_ignores_unusable_next() {
    let mut app = TestApp::new().await;
    let response = app
        .post(
            "/login",
            &[
                ("email", "user@example.com"),
                ("password", "user123"),
                ("next", "/a\u{7f}b"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/products"));
    assert!(app.get("/products").await.body.contains("Hi, user"));

    app.post("/logout", &[]).await;
    let response = app
        .post(
            "/login",
            &[
                ("email", "user@example.com"),
                ("password", "user123"),
                ("next", "//evil.example/products"),
            ],
        )
        .await;
    assert_eq!(response.location(), Some("/products"));
}

#[tokio::test]
async fn test_wrong_password_is_401() {
    let mut app = TestApp::new().await;
    let response = app
        .post(
            "/login",
            &[("email", "user@example.com"), ("password", "admin123")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.contains("Invalid email or password"));
    assert!(response.body.contains("value=\"user@example.com\""), "email is kept");
}

#[tokio::test]
async fn test_logged_in_user_skips_login_page() {
    let mut app = TestApp::new().await;
    app.login("user@example.com", "user123").await;
    let response = app.get("/login?next=/wishlist").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/wishlist"));
}

#[tokio::test]
async fn test_logout_keeps_cart() {
    let mut app = TestApp::new().await;
    app.login("user@example.com", "user123").await;
    app.post("/cart/add", &[("product_id", "1")]).await;

    let response = app.post("/logout", &[]).await;
    assert_eq!(response.location(), Some("/products"));

    let body = app.get("/cart").await.body;
    assert!(!body.contains("Hi, user"));
    assert!(body.contains("Fjallraven Foldsack Backpack"));
}
