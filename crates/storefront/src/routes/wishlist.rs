//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::session;
use crate::routes::{is_htmx, parse_product_id, redirect_back};
use crate::state::AppState;
use crate::views::{Layout, ProductCard};

/// Wishlist form data.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: String,
    #[serde(default)]
    pub return_to: String,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistShowTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
}

/// Heart button fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_button.html")]
pub struct WishlistButtonTemplate {
    pub product_id: i32,
    pub in_wishlist: bool,
    pub return_to: String,
}

/// Display wishlist page.
#[instrument(skip(layout, session))]
pub async fn show(layout: Layout, session: Session) -> Result<impl IntoResponse> {
    let wishlist = session::load_wishlist(&session).await?;
    let products = wishlist
        .items()
        .iter()
        .map(|p| ProductCard::new(p, &wishlist))
        .collect();
    Ok(WishlistShowTemplate { layout, products })
}

/// Add a product, or remove it if it is already wishlisted.
#[instrument(skip(state, session, headers))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<WishlistForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;
    let mut wishlist = session::load_wishlist(&session).await?;

    // A saved product may have left the catalog since; it can still be removed
    let product = match wishlist.get(id) {
        Some(saved) => saved.clone(),
        None => state
            .catalog()
            .await?
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))?,
    };
    let added = wishlist.toggle(product);
    session::save_wishlist(&session, &wishlist).await?;
    tracing::debug!(product_id = %id, added, "Wishlist toggled");

    if is_htmx(&headers) {
        return Ok(WishlistButtonTemplate {
            product_id: id.as_i32(),
            in_wishlist: added,
            return_to: form.return_to,
        }
        .into_response());
    }
    Ok(redirect_back(&form.return_to, "/wishlist").into_response())
}

/// Remove a product.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<WishlistForm>) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;
    let mut wishlist = session::load_wishlist(&session).await?;
    wishlist.remove(id);
    session::save_wishlist(&session, &wishlist).await?;
    Ok(redirect_back(&form.return_to, "/wishlist").into_response())
}

/// Empty the wishlist.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Response> {
    let mut wishlist = session::load_wishlist(&session).await?;
    wishlist.clear();
    session::save_wishlist(&session, &wishlist).await?;
    Ok(Redirect::to("/wishlist").into_response())
}
