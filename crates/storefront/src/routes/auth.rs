//! Authentication route handlers.
//!
//! Logins are checked against the two demo accounts. The signed-in user is
//! stored in the session until logout or session expiry.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tokoku_core::auth::{DEMO_ACCOUNTS, authenticate};
use tokoku_core::types::Role;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::routes::safe_return_path;
use crate::views::Layout;

/// Where a successful login lands without a `next` target.
const DEFAULT_LANDING: &str = "/products";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: String,
}

/// Query parameters of the login page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    pub next: String,
}

// =============================================================================
// Templates
// =============================================================================

/// A demo account as listed on the login page.
#[derive(Debug, Clone)]
pub struct DemoAccountView {
    pub label: String,
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
    pub next: String,
    pub error: Option<String>,
    pub demo_accounts: Vec<DemoAccountView>,
}

impl LoginTemplate {
    fn new(layout: Layout, email: String, next: String, error: Option<String>) -> Self {
        Self {
            layout,
            email,
            next,
            error,
            demo_accounts: DEMO_ACCOUNTS
                .iter()
                .map(|account| DemoAccountView {
                    label: if account.role == Role::Admin {
                        "Admin".to_string()
                    } else {
                        "Customer".to_string()
                    },
                    email: account.email.to_string(),
                    password: account.password.to_string(),
                })
                .collect(),
        }
    }
}

fn landing(next: &str) -> &str {
    safe_return_path(next).unwrap_or(DEFAULT_LANDING)
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login page. Signed-in users go straight to their target.
#[instrument(skip(layout, user))]
pub async fn login_page(
    OptionalUser(user): OptionalUser,
    layout: Layout,
    Query(query): Query<LoginQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to(landing(&query.next)).into_response();
    }
    LoginTemplate::new(layout, String::new(), query.next, None).into_response()
}

/// Handle login form submission.
#[instrument(skip(session, layout, form), fields(email = %form.email.trim()))]
pub async fn login(
    session: Session,
    layout: Layout,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match authenticate(&form.email, &form.password) {
        Ok(user) => {
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id, Some(&user.email));
            add_breadcrumb("auth", "Logged in", Some(&[("role", user.role.as_str())]));
            tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

            Ok(Redirect::to(landing(&form.next)).into_response())
        }
        Err(err) => {
            tracing::warn!("Login failed: {err}");
            let page = LoginTemplate::new(layout, form.email, form.next, Some(err.to_string()));
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
    }
}

/// Handle logout. The cart and wishlist stay in the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    tracing::info!("User logged out");
    Ok(Redirect::to(DEFAULT_LANDING))
}
