//! Demo product catalog client.
//!
//! # Architecture
//!
//! - One REST endpoint: `GET {CATALOG_API_URL}/products` returning a JSON array
//! - The demo API is the source of truth for remote products, no local sync
//! - In-memory caching via `moka` (TTL from `CATALOG_CACHE_TTL_SECS`)
//! - No retry: a failed fetch is shown to the visitor as a static message
//!
//! Products created from the dashboard are not sent anywhere; they live in
//! [`crate::state::AppState`] and are merged into the listing there.

mod client;

pub use client::CatalogClient;

use thiserror::Error;

/// Message shown to visitors whenever the product fetch fails.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch products";

/// Errors that can occur when fetching the product list.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Catalog API returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The body was not a JSON array of products.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = CatalogError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "maintenance".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Catalog API returned HTTP 503 Service Unavailable: maintenance"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let parse = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = CatalogError::from(parse);
        assert!(err.to_string().starts_with("JSON parse error:"));
    }
}
