//! Authentication extractors.
//!
//! The signed-in user is read from the session. There are no tokens and no
//! expiry beyond the session's own inactivity expiry.

use axum::{
    extract::FromRequestParts,
    http::{Method, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tokoku_core::auth::SessionUser;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// Extractor that requires a signed-in user.
///
/// Anonymous visitors are redirected to the login page, which sends them back
/// to the page they asked for.
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireUser(pub SessionUser);

/// Extractor that requires a signed-in admin.
///
/// Anonymous visitors go to `/login?next=/dashboard`; signed-in customers get
/// a 403 page.
pub struct RequireAdmin(pub SessionUser);

/// Extractor that optionally gets the signed-in user.
pub struct OptionalUser(pub Option<SessionUser>);

/// Error returned when a route needs a user the request does not have.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login page, then back to `next`.
    RedirectToLogin { next: Option<String> },
    /// Signed in, but not an admin.
    Forbidden,
    /// No session layer in front of the route.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next: Some(next) } => {
                Redirect::to(&login_url(&next)).into_response()
            }
            Self::RedirectToLogin { next: None } => Redirect::to("/login").into_response(),
            Self::Forbidden => {
                AppError::Forbidden("admin role required".to_string()).into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// `/login?next=...` with the target percent-encoded, keeping slashes readable.
#[must_use]
pub fn login_url(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("/login?next={}", encoded.replace("%2F", "/"))
}

async fn session_user(parts: &Parts) -> Result<Option<SessionUser>, AuthRejection> {
    // Get the session from extensions (set by SessionManagerLayer)
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::Unauthorized)?;

    Ok(session
        .get::<SessionUser>(session_keys::USER)
        .await
        .ok()
        .flatten())
}

/// Where to come back to after logging in. Only page loads come back.
fn return_target(parts: &Parts) -> Option<String> {
    (parts.method == Method::GET).then(|| {
        parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), ToString::to_string)
    })
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_user(parts)
            .await?
            .map(Self)
            .ok_or_else(|| AuthRejection::RedirectToLogin {
                next: return_target(parts),
            })
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = session_user(parts)
            .await?
            .ok_or_else(|| AuthRejection::RedirectToLogin {
                next: Some("/dashboard".to_string()),
            })?;

        if user.is_admin() {
            Ok(Self(user))
        } else {
            tracing::warn!(user_id = %user.id, "Non-admin tried to open the dashboard");
            Err(AuthRejection::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await.ok().flatten()))
    }
}

/// Store the signed-in user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::USER, user).await
}

/// Remove the signed-in user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<SessionUser>(session_keys::USER).await?;
    Ok(())
}
