//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Redirect to /products
//! GET  /health                    - Liveness check
//!
//! # Products
//! GET  /products                  - Listing with search, filters, sort, pagination
//! GET  /products/{id}             - Detail, related products, reviews
//! POST /products/{id}/reviews              - Add review (login required)
//! POST /products/{id}/reviews/{rid}        - Edit own review
//! POST /products/{id}/reviews/{rid}/delete - Delete own review
//! GET  /search/suggest?q=         - Suggestions fragment (HTMX)
//!
//! # Cart (HTMX fragments or redirects)
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add product
//! POST /cart/update               - Set quantity (0 removes)
//! POST /cart/remove               - Remove line
//! POST /cart/clear                - Empty cart
//! POST /cart/toggle               - Open/close the sidebar
//! GET  /cart/count                - Count badge fragment
//!
//! # Wishlist
//! GET  /wishlist                  - Wishlist page
//! POST /wishlist/toggle           - Add or remove product
//! POST /wishlist/remove           - Remove product
//! POST /wishlist/clear            - Empty wishlist
//!
//! # Auth
//! GET  /login                     - Login page
//! POST /login                     - Login action (rate limited)
//! POST /logout                    - Logout action
//!
//! # Checkout
//! GET  /checkout                  - Shipping form or empty-cart notice
//! POST /checkout                  - Validate, simulate payment, record order
//! GET  /checkout/complete         - Confirmation for the last order
//!
//! # Dashboard (admin role)
//! GET  /dashboard?tab=            - Overview, products, orders, users
//! POST /dashboard/orders/{id}/status
//! POST /dashboard/users/{id}/role
//! POST /dashboard/products
//! POST /dashboard/products/{id}
//! POST /dashboard/products/{id}/delete
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod products;
pub mod reviews;
pub mod search;
pub mod wishlist;

use axum::{
    Router,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tokoku_core::types::ProductId;

use crate::error::{AppError, ErrorTemplate, Result};
use crate::middleware::login_rate_limiter;
use crate::state::AppState;
use crate::views::Layout;

/// Header set by HTMX on its requests.
pub const HX_REQUEST: &str = "hx-request";

/// Header that asks HTMX to fire a client-side event.
pub const HX_TRIGGER: &str = "hx-trigger";

/// Whether the request came from HTMX and wants a fragment back.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|v| v.as_bytes() == b"true")
}

/// A same-site path to go back to, or `None` for anything that could leave
/// the site or cannot go in a `Location` header.
#[must_use]
pub fn safe_return_path(candidate: &str) -> Option<&str> {
    let candidate = candidate.trim();
    (candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.contains('\\')
        && candidate.bytes().all(|b| b.is_ascii_graphic()))
    .then_some(candidate)
}

/// 303 to `return_to` when it is a local path, otherwise to `fallback`.
#[must_use]
pub fn redirect_back(return_to: &str, fallback: &str) -> Redirect {
    Redirect::to(safe_return_path(return_to).unwrap_or(fallback))
}

/// Parse a product id from a path or form field. Garbage is a 404.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if `raw` is not a number.
pub fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/reviews", post(reviews::create))
        .route("/{id}/reviews/{review_id}", post(reviews::update))
        .route("/{id}/reviews/{review_id}/delete", post(reviews::delete))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/toggle", post(cart::toggle))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/remove", post(wishlist::remove))
        .route("/clear", post(wishlist::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/complete", get(checkout::complete))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/orders/{id}/status", post(dashboard::update_order_status))
        .route("/users/{id}/role", post(dashboard::update_user_role))
        .route("/products", post(dashboard::create_product))
        .route("/products/{id}", post(dashboard::update_product))
        .route("/products/{id}/delete", post(dashboard::delete_product))
}

/// Create the auth routes router. `POST /login` is rate limited when enabled.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let login = Router::new().route("/login", post(auth::login));
    let login = if rate_limit {
        login.layer(login_rate_limiter())
    } else {
        login
    };

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/logout", post(auth::logout))
        .merge(login)
}

/// Create all routes for the storefront.
pub fn routes(login_rate_limit: bool) -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .nest("/products", product_routes())
        .route("/search/suggest", get(search::suggest))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/checkout", checkout_routes())
        .nest("/dashboard", dashboard_routes())
        .merge(auth_routes(login_rate_limit))
        .fallback(not_found)
}

async fn home() -> Redirect {
    Redirect::to("/products")
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// 404 page for unknown paths.
async fn not_found(layout: Layout) -> Response {
    (
        StatusCode::NOT_FOUND,
        ErrorTemplate {
            layout,
            status: StatusCode::NOT_FOUND.as_u16(),
            message: "Page not found".to_string(),
        },
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_safe_return_path() {
        assert_eq!(safe_return_path("/products?page=2"), Some("/products?page=2"));
        assert_eq!(safe_return_path("https://evil.example"), None);
        assert_eq!(safe_return_path("//evil.example"), None);
        assert_eq!(safe_return_path("/\\evil.example"), None);
        assert_eq!(safe_return_path(""), None);
    }

    #[test]
    fn test_safe_return_path_needs_header_safe_text() {
        assert_eq!(safe_return_path("/products\nx"), None);
        assert_eq!(safe_return_path("/products\r\nSet-Cookie: a=b"), None);
        assert_eq!(safe_return_path("/a\u{7f}b"), None);
        assert_eq!(safe_return_path("/a\tb"), None);
        assert_eq!(safe_return_path("/caf\u{e9}"), None);
        assert_eq!(safe_return_path("/a b"), None);
        assert_eq!(
            safe_return_path("/products?q=men%27s+clothing"),
            Some("/products?q=men%27s+clothing")
        );
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_parse_product_id() {
        assert_eq!(parse_product_id("7").ok(), Some(ProductId::new(7)));
        assert!(matches!(parse_product_id("seven"), Err(AppError::NotFound(_))));
    }
}
