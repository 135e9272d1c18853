//! Display data shared by the page templates.
//!
//! Templates only see plain strings, numbers and flags; everything that needs
//! formatting or a store lookup is done here.

use axum::{extract::FromRequestParts, http::request::Parts};
use tokoku_core::admin::Order;
use tokoku_core::auth::SessionUser;
use tokoku_core::cart::{Cart, CartItem};
use tokoku_core::pagination::PageWindow;
use tokoku_core::product::Product;
use tokoku_core::wishlist::Wishlist;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session;

/// Header, cart sidebar and footer data every page carries.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub user: Option<SessionUser>,
    pub cart: CartView,
    pub wishlist_count: usize,
}

impl Layout {
    #[must_use]
    pub fn new(user: Option<SessionUser>, cart: &Cart, wishlist: &Wishlist) -> Self {
        Self {
            user,
            cart: CartView::from(cart),
            wishlist_count: wishlist.count(),
        }
    }

    /// Build the layout from the visitor's session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn load(session: &Session) -> Result<Self, AppError> {
        let user = session::load_user(session).await?;
        let cart = session::load_cart(session).await?;
        let wishlist = session::load_wishlist(session).await?;
        Ok(Self::new(user, &cart, &wishlist))
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(SessionUser::is_admin)
    }

    #[must_use]
    pub fn username(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.username.as_str())
    }
}

impl<S> FromRequestParts<S> for Layout
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(session) => Self::load(session).await,
            None => Ok(Self::default()),
        }
    }
}

/// The cart as the sidebar and cart page show it.
#[derive(Debug, Clone, Default)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_items: u32,
    pub total_price: String,
    pub is_open: bool,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.items().iter().map(CartLineView::from).collect(),
            total_items: cart.total_items(),
            total_price: cart.total_price().to_string(),
            is_open: cart.is_open(),
        }
    }
}

/// One cart line.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub product_id: i32,
    pub title: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartItem> for CartLineView {
    fn from(line: &CartItem) -> Self {
        Self {
            product_id: line.product.id.as_i32(),
            title: line.product.title.clone(),
            image: line.product.image.clone(),
            price: line.product.price.to_string(),
            quantity: line.quantity,
            line_total: line.line_total().to_string(),
        }
    }
}

/// A product tile in a grid.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: i32,
    pub title: String,
    pub price: String,
    pub category: String,
    pub image: String,
    pub stars: String,
    pub rating: String,
    pub rating_count: u32,
    pub in_wishlist: bool,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, wishlist: &Wishlist) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
            image: product.image.clone(),
            stars: stars(product.rating.rate),
            rating: format!("{:.1}", product.rating.rate),
            rating_count: product.rating.count,
            in_wishlist: wishlist.contains(product.id),
        }
    }
}

/// Five-character star strip, rounded to the nearest whole star.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn stars(rate: f64) -> String {
    let filled = rate.round().clamp(0.0, 5.0) as usize;
    "★".repeat(filled) + &"☆".repeat(5 - filled)
}

/// An order as the confirmation page and dashboard list it.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub customer: String,
    pub date: String,
    pub status: String,
    pub status_label: String,
    pub item_count: u32,
    pub total: String,
    pub shipping_address: String,
    pub lines: Vec<OrderLineView>,
}

/// One line of an order.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub product_id: i32,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            customer: order.user_name.clone(),
            date: order.date.format("%Y-%m-%d").to_string(),
            status: order.status.as_str().to_string(),
            status_label: order.status.label().to_string(),
            item_count: order.item_count(),
            total: order.total.to_string(),
            shipping_address: order.shipping_address.clone(),
            lines: order
                .items
                .iter()
                .map(|item| OrderLineView {
                    product_id: item.product_id.as_i32(),
                    name: item.product_name.clone(),
                    quantity: item.quantity,
                    price: item.price.to_string(),
                    line_total: item.price.times(item.quantity).to_string(),
                })
                .collect(),
        }
    }
}

/// A numbered link in the pagination strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// The pagination strip under a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub pages: Vec<PageLink>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
    pub total_pages: usize,
}

impl Pagination {
    /// Links for `window`, with `href` building the URL of a page number.
    #[must_use]
    pub fn new(current: usize, window: &PageWindow, href: impl Fn(usize) -> String) -> Self {
        Self {
            pages: window
                .pages
                .iter()
                .map(|&number| PageLink {
                    number,
                    href: href(number),
                    current: number == current,
                })
                .collect(),
            previous: (current > 1).then(|| href(current - 1)),
            next: (current < window.last).then(|| href(current + 1)),
            first: window.show_first.then(|| href(1)),
            last: window.show_last.then(|| href(window.last)),
            leading_ellipsis: window.show_leading_ellipsis,
            trailing_ellipsis: window.show_trailing_ellipsis,
            total_pages: window.last,
        }
    }

    /// Whether there is more than one page.
    #[must_use]
    pub fn is_needed(&self) -> bool {
        self.total_pages > 1
    }
}

#[cfg(test)]
mod tests {
    use tokoku_core::pagination::page_window;
    use tokoku_core::types::{Price, ProductId};
    use tokoku_core::product::Rating;

    use super::*;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            description: String::new(),
            category: "jewelery".to_string(),
            image: format!("https://img.example.com/{id}.jpg"),
            rating: Rating {
                rate: 3.6,
                count: 145,
            },
        }
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(3.6), "★★★★☆");
        assert_eq!(stars(0.0), "☆☆☆☆☆");
        assert_eq!(stars(7.0), "★★★★★");
    }

    #[test]
    fn test_product_card() {
        let mut wishlist = Wishlist::default();
        wishlist.add(product(2, 999));
        let card = ProductCard::new(&product(2, 999), &wishlist);
        assert_eq!(card.price, "$9.99");
        assert_eq!(card.rating, "3.6");
        assert!(card.in_wishlist);
        assert!(!ProductCard::new(&product(3, 999), &wishlist).in_wishlist);
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::default();
        cart.add(product(1, 1050));
        cart.add(product(1, 1050));
        cart.open();
        let view = CartView::from(&cart);
        assert_eq!(view.total_items, 2);
        assert_eq!(view.total_price, "$21.00");
        assert_eq!(view.lines[0].line_total, "$21.00");
        assert!(view.is_open);
    }

    #[test]
    fn test_pagination_links() {
        let window = page_window(5, 10, 5);
        let pagination = Pagination::new(5, &window, |n| format!("/products?page={n}"));
        let numbers: Vec<usize> = pagination.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![3, 4, 5, 6, 7]);
        assert!(pagination.pages[2].current);
        assert_eq!(pagination.previous.as_deref(), Some("/products?page=4"));
        assert_eq!(pagination.first.as_deref(), Some("/products?page=1"));
        assert_eq!(pagination.last.as_deref(), Some("/products?page=10"));
        assert!(pagination.leading_ellipsis);
        assert_eq!(pagination.total_pages, 10);
        assert!(pagination.is_needed());
    }

    #[test]
    fn test_single_page_needs_no_strip() {
        let window = page_window(1, 1, 5);
        let pagination = Pagination::new(1, &window, |n| format!("?page={n}"));
        assert!(!pagination.is_needed());
        assert_eq!(pagination.next, None);
    }
}
