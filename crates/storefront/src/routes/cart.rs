//! Cart route handlers.
//!
//! The cart lives in the visitor's session. HTMX requests get a fragment back
//! plus a `cart-updated` trigger; plain form posts are redirected.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tokoku_core::cart::Cart;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::session;
use crate::routes::{HX_TRIGGER, is_htmx, parse_product_id, redirect_back};
use crate::state::AppState;
use crate::views::{CartView, Layout};

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default)]
    pub return_to: String,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: String,
    #[serde(default)]
    pub return_to: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
    #[serde(default)]
    pub return_to: String,
}

/// Forms that only carry a return path.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReturnForm {
    pub return_to: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart lines and totals fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(layout))]
pub async fn show(layout: Layout) -> impl IntoResponse {
    CartShowTemplate {
        cart: layout.cart.clone(),
        layout,
    }
}

/// Add one unit of a product (HTMX or form post).
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;
    let product = state
        .catalog()
        .await?
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut cart = session::load_cart(&session).await?;
    cart.add(product);
    session::save_cart(&session, &cart).await?;

    tracing::debug!(product_id = %id, total_items = cart.total_items(), "Added to cart");
    add_breadcrumb("cart", "Added product", Some(&[("product_id", &id.to_string())]));

    if is_htmx(&headers) {
        return Ok(count_fragment(&cart));
    }
    Ok(redirect_back(&form.return_to, "/cart").into_response())
}

/// Set the quantity of a line. Zero removes it.
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;
    let quantity: u32 = form
        .quantity
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Quantity must be a whole number".to_string()))?;

    let mut cart = session::load_cart(&session).await?;
    cart.update_quantity(id, quantity);
    session::save_cart(&session, &cart).await?;

    Ok(cart_response(&cart, &headers, &form.return_to))
}

/// Remove a line.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;

    let mut cart = session::load_cart(&session).await?;
    cart.remove(id);
    session::save_cart(&session, &cart).await?;

    Ok(cart_response(&cart, &headers, &form.return_to))
}

/// Empty the cart.
#[instrument(skip(session, headers))]
pub async fn clear(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ReturnForm>,
) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;
    cart.clear();
    session::save_cart(&session, &cart).await?;

    Ok(cart_response(&cart, &headers, &form.return_to))
}

/// Open or close the cart sidebar.
#[instrument(skip(session))]
pub async fn toggle(session: Session, Form(form): Form<ReturnForm>) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;
    cart.toggle();
    session::save_cart(&session, &cart).await?;

    Ok(redirect_back(&form.return_to, "/products").into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = session::load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.total_items(),
    })
}

fn count_fragment(cart: &Cart) -> Response {
    (
        AppendHeaders([(HX_TRIGGER, "cart-updated")]),
        CartCountTemplate {
            count: cart.total_items(),
        },
    )
        .into_response()
}

fn cart_response(cart: &Cart, headers: &HeaderMap, return_to: &str) -> Response {
    if is_htmx(headers) {
        return (
            AppendHeaders([(HX_TRIGGER, "cart-updated")]),
            CartItemsTemplate {
                cart: CartView::from(cart),
            },
        )
            .into_response();
    }
    redirect_back(return_to, "/cart").into_response()
}
