//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tokoku_core::review::ReviewError;

use crate::catalog::{CatalogError, FETCH_FAILED_MESSAGE};
use crate::filters;
use crate::views::Layout;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The demo product API could not be read.
    #[error("Catalog error: {0}")]
    Catalog(#[from] Arc<CatalogError>),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Editing a review failed.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is authenticated but lacks the role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Catalog(_) => StatusCode::BAD_GATEWAY,
            Self::Review(ReviewError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Review(ReviewError::NotOwner) | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to the visitor.
    #[must_use]
    pub fn public_message(&self) -> String {
        // Don't expose internal error details to clients
        match self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Catalog(_) => FETCH_FAILED_MESSAGE.to_string(),
            Self::Review(err) => capitalize(&err.to_string()),
            Self::NotFound(_) => "Page not found".to_string(),
            Self::Forbidden(_) => "You do not have access to this page".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

/// Full-page error view.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub layout: Layout,
    pub status: u16,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Session(_) | Self::Internal(_) | Self::Catalog(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let page = ErrorTemplate {
            layout: Layout::default(),
            status: status.as_u16(),
            message: self.public_message(),
        };

        (status, page).into_response()
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
