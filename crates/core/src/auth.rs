//! Demo sign-in against a fixed account table.
//!
//! There is no password hashing and no lockout: the two demo accounts are
//! listed on the login page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AccountId, Role};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
}

/// The signed-in visitor, as stored in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl SessionUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A demo account shown on the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoAccount {
    pub id: &'static str,
    pub username: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
}

impl DemoAccount {
    fn session_user(&self) -> SessionUser {
        SessionUser {
            id: AccountId::from(self.id),
            username: self.username.to_string(),
            email: self.email.to_string(),
            role: self.role,
        }
    }
}

pub const DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        id: "demo-user",
        username: "user",
        email: "user@example.com",
        password: "user123",
        role: Role::Customer,
    },
    DemoAccount {
        id: "demo-admin",
        username: "admin",
        email: "admin@example.com",
        password: "admin123",
        role: Role::Admin,
    },
];

/// Check an email and password against the demo accounts.
///
/// The email is trimmed and compared without regard to ASCII case. The
/// password must match exactly.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] for anything else.
pub fn authenticate(email: &str, password: &str) -> Result<SessionUser, AuthError> {
    let email = email.trim();
    DEMO_ACCOUNTS
        .iter()
        .find(|account| account.email.eq_ignore_ascii_case(email) && account.password == password)
        .map(DemoAccount::session_user)
        .ok_or(AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_login() {
        let user = authenticate("user@example.com", "user123").unwrap();
        assert_eq!(user.username, "user");
        assert_eq!(user.role, Role::Customer);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_admin_login_ignores_email_case_and_padding() {
        let user = authenticate("  Admin@Example.com ", "admin123").unwrap();
        assert_eq!(user.id, AccountId::from("demo-admin"));
        assert!(user.is_admin());
    }

    #[test]
    fn test_everything_else_is_rejected() {
        let rejected = [
            ("user@example.com", "admin123"),
            ("admin@example.com", "user123"),
            ("user@example.com", "USER123"),
            ("someone@example.com", "user123"),
            ("", ""),
        ];
        for (email, password) in rejected {
            assert_eq!(
                authenticate(email, password),
                Err(AuthError::InvalidCredentials),
                "{email} / {password}"
            );
        }
    }

    #[test]
    fn test_error_message_is_generic() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_session_user_json_shape() {
        let user = authenticate("admin@example.com", "admin123").unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["username"], "admin");
    }
}
