//! Integration tests for catalog browsing.

use axum::http::StatusCode;
use tokoku_integration_tests::{TestApp, mock_catalog, sample_products};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_root_redirects_to_products() {
    let mut app = TestApp::new().await;
    let response = app.get("/").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/products"));
}

#[tokio::test]
async fn test_listing_shows_first_page() {
    let mut app = TestApp::new().await;
    let response = app.get("/products").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("14 product(s)"));
    assert!(response.body.contains("Slim Fit T-Shirt"));
    assert!(response.body.contains("page=2"), "pagination links to page 2");
}

#[tokio::test]
async fn test_listing_search_and_category() {
    let mut app = TestApp::new().await;

    let response = app.get("/products?q=bracelet").await;
    assert!(response.body.contains("1 product(s)"));
    assert!(response.body.contains("Silver Dragon Bracelet"));
    assert!(!response.body.contains("Slim Fit T-Shirt"));

    let response = app.get("/products?category=electronics").await;
    assert!(response.body.contains("1 product(s)"));
    assert!(response.body.contains("Portable External Hard Drive"));
}

#[tokio::test]
async fn test_listing_in_stock_filter_hides_unrated() {
    let mut app = TestApp::new().await;
    let response = app.get("/products?category=electronics&in_stock=on").await;
    assert!(response.body.contains("0 product(s)"));
    assert!(response.body.contains("No products match these filters."));
}

#[tokio::test]
async fn test_listing_ignores_non_numeric_rating() {
    let mut app = TestApp::new().await;
    for query in ["min_rating=NaN", "min_rating=inf", "min_rating=abc"] {
        let response = app.get(&format!("/products?{query}")).await;
        assert_eq!(response.status, StatusCode::OK, "{query}");
        assert!(response.body.contains("14 product(s)"), "{query}");
    }
}

#[tokio::test]
async fn test_listing_out_of_range_page_is_clamped() {
    let mut app = TestApp::new().await;
    let response = app.get("/products?page=99").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("aria-current=\"page\">2<"));
}

#[tokio::test]
async fn test_catalog_is_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_products()))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = TestApp::with_catalog(server);
    app.get("/products").await;
    app.get("/products/1").await;
    app.get("/products?q=jacket").await;
}

// =============================================================================
// Detail
// =============================================================================

#[tokio::test]
async fn test_detail_page() {
    let mut app = TestApp::new().await;
    let response = app.get("/products/1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Fjallraven Foldsack Backpack"));
    assert!(response.body.contains("$109.95"));
    assert!(response.body.contains("Excellent product!"), "seeded review");
    assert!(response.body.contains("Related products"));
    assert!(response.body.contains("Slim Fit T-Shirt"), "same category");
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let mut app = TestApp::new().await;
    assert_eq!(app.get("/products/999").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/products/abc").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_path_is_404_page() {
    let mut app = TestApp::new().await;
    let response = app.get("/no-such-page").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Page not found"));
}

// =============================================================================
// Failures and Extras
// =============================================================================

#[tokio::test]
async fn test_catalog_failure_shows_static_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut app = TestApp::with_catalog(server);
    let response = app.get("/products").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.body.contains("Failed to fetch products"));
    assert!(!response.body.contains("boom"));
}

#[tokio::test]
async fn test_search_suggestions_fragment() {
    let mut app = TestApp::new().await;

    let response = app.get("/search/suggest?q=rain").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Rain Jacket 5"));
    assert!(!response.body.contains("<html"), "fragment only");

    let response = app.get("/search/suggest?q=r").await;
    assert!(!response.body.contains("<li"));
}

#[tokio::test]
async fn test_health_and_headers() {
    let server = mock_catalog(sample_products()).await;
    let mut app = TestApp::with_catalog(server);
    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
    assert!(response.header("x-request-id").is_some());
    assert_eq!(response.header("x-frame-options"), Some("DENY"));
}
