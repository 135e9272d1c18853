//! Checkout route handlers.
//!
//! Payment is simulated: after the shipping form validates, the handler waits
//! for the configured delay, records the order on the admin board and empties
//! the cart. Guests may check out.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tokoku_core::checkout::{CheckoutForm, place_order};
use tokoku_core::validation::FieldErrors;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::session;
use crate::state::AppState;
use crate::views::{CartView, Layout, OrderView};

// =============================================================================
// Templates
// =============================================================================

/// Inline messages for the shipping form, one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutErrors {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
}

impl From<&FieldErrors> for CheckoutErrors {
    fn from(errors: &FieldErrors) -> Self {
        let get = |field: &str| errors.get(field).map(str::to_owned);
        Self {
            full_name: get("full_name"),
            email: get("email"),
            phone: get("phone"),
            address: get("address"),
            city: get("city"),
            postal_code: get("postal_code"),
            notes: get("notes"),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub form: CheckoutForm,
    pub errors: CheckoutErrors,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct CheckoutCompleteTemplate {
    pub layout: Layout,
    pub order: OrderView,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the shipping form, or an empty-cart notice.
#[instrument(skip(layout))]
pub async fn show(layout: Layout) -> impl IntoResponse {
    let form = CheckoutForm {
        email: layout
            .user
            .as_ref()
            .map(|user| user.email.clone())
            .unwrap_or_default(),
        ..CheckoutForm::default()
    };
    CheckoutTemplate {
        cart: layout.cart.clone(),
        layout,
        form,
        errors: CheckoutErrors::default(),
    }
}

/// Validate the form, simulate payment and record the order.
#[instrument(skip(state, session, layout, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/checkout").into_response());
    }

    let shipping = match form.validate() {
        Ok(shipping) => shipping,
        Err(errors) => {
            tracing::debug!(fields = errors.len(), "Checkout form rejected");
            let page = CheckoutTemplate {
                cart: layout.cart.clone(),
                layout,
                errors: CheckoutErrors::from(&errors),
                form,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    tokio::time::sleep(state.config().checkout_delay).await;

    let user = session::load_user(&session).await?;
    let today = chrono::Local::now().date_naive();
    let order = place_order(&cart, &shipping, user.as_ref(), today);
    let order_id = order.id.clone();
    let total = order.total;
    state.admin_mut()?.record_order(order);

    cart.clear();
    cart.close();
    session::save_cart(&session, &cart).await?;
    session::set_last_order(&session, &order_id).await?;

    tracing::info!(order_id = %order_id, total = %total, "Order placed");
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.as_str())]));

    Ok(Redirect::to("/checkout/complete").into_response())
}

/// Confirmation page for the visitor's last order.
#[instrument(skip(state, session, layout))]
pub async fn complete(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
) -> Result<Response> {
    let Some(order_id) = session::last_order(&session).await? else {
        return Ok(Redirect::to("/products").into_response());
    };
    let order = state.admin()?.order(&order_id).map(OrderView::from);
    match order {
        Some(order) => Ok(CheckoutCompleteTemplate { layout, order }.into_response()),
        None => Ok(Redirect::to("/products").into_response()),
    }
}
