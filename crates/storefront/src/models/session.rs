//! Session-stored visitor state.
//!
//! The cart, wishlist and signed-in user of each visitor are kept as JSON
//! values in the session, one key per store. Handlers load a store, mutate it
//! as a value and write it back.

use tokoku_core::auth::SessionUser;
use tokoku_core::cart::{Cart, CartItem};
use tokoku_core::types::OrderId;
use tokoku_core::wishlist::Wishlist;
use tower_sessions::Session;
use tower_sessions::session::Error;

/// Session keys.
pub mod keys {
    /// Cart lines.
    pub const CART: &str = "cart";

    /// Whether the cart sidebar is open.
    pub const CART_OPEN: &str = "cart_open";

    /// Wishlisted products.
    pub const WISHLIST: &str = "wishlist";

    /// The signed-in user.
    pub const USER: &str = "user";

    /// Order shown on the confirmation page.
    pub const LAST_ORDER: &str = "last_order";
}

/// Load the visitor's cart. A missing cart is an empty, closed one.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or holds bad JSON.
pub async fn load_cart(session: &Session) -> Result<Cart, Error> {
    let items: Vec<CartItem> = session.get(keys::CART).await?.unwrap_or_default();
    let is_open: bool = session.get(keys::CART_OPEN).await?.unwrap_or(false);
    Ok(Cart::from_lines(items, is_open))
}

/// Write the cart back.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), Error> {
    session.insert(keys::CART, cart.items()).await?;
    session.insert(keys::CART_OPEN, cart.is_open()).await
}

/// Load the visitor's wishlist.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or holds bad JSON.
pub async fn load_wishlist(session: &Session) -> Result<Wishlist, Error> {
    Ok(session.get(keys::WISHLIST).await?.unwrap_or_default())
}

/// Write the wishlist back.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_wishlist(session: &Session, wishlist: &Wishlist) -> Result<(), Error> {
    session.insert(keys::WISHLIST, wishlist).await
}

/// The signed-in user, if any.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or holds bad JSON.
pub async fn load_user(session: &Session) -> Result<Option<SessionUser>, Error> {
    session.get(keys::USER).await
}

/// Remember the order just placed.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_last_order(session: &Session, id: &OrderId) -> Result<(), Error> {
    session.insert(keys::LAST_ORDER, id).await
}

/// The order placed last in this session.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or holds bad JSON.
pub async fn last_order(session: &Session) -> Result<Option<OrderId>, Error> {
    session.get(keys::LAST_ORDER).await
}
