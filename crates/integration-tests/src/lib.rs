//! Integration tests for Tokoku.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tokoku-integration-tests
//! ```
//!
//! Each test builds the real storefront router and drives it with
//! `tower::ServiceExt::oneshot`. The demo catalog is served by a `wiremock`
//! server, so no network access is needed. The session cookie is carried
//! between requests like a browser would.
//!
//! # Test Categories
//!
//! - `catalog` - listing, filters, detail pages, catalog failures
//! - `cart` / `wishlist` - session-backed stores, HTMX fragments
//! - `auth` / `reviews` - demo logins and review ownership
//! - `checkout` / `dashboard` - simulated orders and the admin board

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tokoku_storefront::config::StorefrontConfig;
use tokoku_storefront::state::AppState;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Number of products in [`sample_products`].
pub const SAMPLE_PRODUCT_COUNT: usize = 14;

/// A catalog with a few named products and enough filler to need two pages.
#[must_use]
pub fn sample_products() -> Value {
    let mut products = vec![
        json!({
            "id": 1,
            "title": "Fjallraven Foldsack Backpack",
            "price": 109.95,
            "description": "Fits 15 inch laptops",
            "category": "men's clothing",
            "image": "https://img.example.com/1.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }),
        json!({
            "id": 2,
            "title": "Slim Fit T-Shirt",
            "price": 22.3,
            "description": "Slim fitting casual shirt",
            "category": "men's clothing",
            "image": "https://img.example.com/2.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        }),
        json!({
            "id": 3,
            "title": "Silver Dragon Bracelet",
            "price": 695,
            "description": "From our legends collection",
            "category": "jewelery",
            "image": "https://img.example.com/3.jpg",
            "rating": { "rate": 4.6, "count": 400 }
        }),
        json!({
            "id": 4,
            "title": "Portable External Hard Drive",
            "price": 64,
            "description": "USB 3.0 and USB 2.0 compatible",
            "category": "electronics",
            "image": "https://img.example.com/4.jpg",
            "rating": { "rate": 3.3, "count": 0 }
        }),
    ];
    for id in 5..=SAMPLE_PRODUCT_COUNT {
        products.push(json!({
            "id": id,
            "title": format!("Rain Jacket {id}"),
            "price": 39.99,
            "description": "Lightweight rain jacket",
            "category": "women's clothing",
            "image": format!("https://img.example.com/{id}.jpg"),
            "rating": { "rate": 3.8, "count": 70 }
        }));
    }
    Value::Array(products)
}

/// Start a mock catalog serving `products` at `GET /products`.
pub async fn mock_catalog(products: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products))
        .mount(&server)
        .await;
    server
}

/// Configuration pointing at `catalog_url`, with no checkout delay and no
/// login rate limit.
///
/// # Panics
///
/// Panics if the configuration cannot be built.
#[must_use]
pub fn test_config(catalog_url: &str) -> StorefrontConfig {
    let catalog_url = catalog_url.to_string();
    StorefrontConfig::from_lookup(move |key| match key {
        "CATALOG_API_URL" => Some(catalog_url.clone()),
        "CHECKOUT_DELAY_MS" => Some("0".to_string()),
        "LOGIN_RATE_LIMIT" => Some("false".to_string()),
        _ => None,
    })
    .expect("test configuration should be valid")
}

/// A response with its body read into a string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// A response header as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One browser: the router plus the session cookie it was handed.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub catalog: MockServer,
    cookie: Option<String>,
}

impl TestApp {
    /// A storefront backed by [`sample_products`].
    pub async fn new() -> Self {
        Self::with_catalog(mock_catalog(sample_products()).await)
    }

    /// A storefront backed by an already configured mock catalog.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    #[must_use]
    pub fn with_catalog(catalog: MockServer) -> Self {
        let state = AppState::new(test_config(&catalog.uri())).expect("state should build");
        Self {
            router: tokoku_storefront::app(state.clone()),
            state,
            catalog,
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, false).await
    }

    /// Submit a form like a plain browser post.
    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        self.send(Method::POST, uri, Some(form), false).await
    }

    /// Submit a form the way the enhancement script does.
    pub async fn post_htmx(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        self.send(Method::POST, uri, Some(form), true).await
    }

    /// Log in with one of the demo accounts.
    ///
    /// # Panics
    ///
    /// Panics if the login is rejected.
    pub async fn login(&mut self, email: &str, password: &str) {
        let response = self
            .post("/login", &[("email", email), ("password", password)])
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "login should succeed");
    }

    /// Forget the session cookie (a fresh browser).
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    async fn send(
        &mut self,
        method: Method,
        uri: &str,
        form: Option<&[(&str, &str)]>,
        htmx: bool,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if htmx {
            builder = builder.header("hx-request", "true");
        }
        let body = match form {
            Some(fields) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields)
                    .finish();
                Body::from(encoded)
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = session_cookie(response.headers()) {
            self.cookie = Some(cookie);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// The `name=value` part of the session `Set-Cookie` header.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("tokoku_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}
