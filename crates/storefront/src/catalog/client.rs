//! HTTP client for the demo product API.

use std::sync::Arc;

use moka::future::Cache;
use tokoku_core::product::Product;
use tracing::{debug, instrument};

use super::CatalogError;
use crate::config::CatalogConfig;

/// Client for the demo product API.
///
/// The product list is cached as a whole. Concurrent cache misses share a
/// single request, and failures are never cached.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: String,
    cache: Cache<(), Arc<Vec<Product>>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("tokoku/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.products_url(),
                cache,
            }),
        })
    }

    /// Fetch every remote product, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns the (shared) error of the underlying request.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Arc<Vec<Product>>, Arc<CatalogError>> {
        self.inner
            .cache
            .try_get_with((), async {
                debug!(endpoint = %self.inner.endpoint, "Cache miss for product list");
                self.request_products().await.map(Arc::new)
            })
            .await
    }

    async fn request_products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self.inner.client.get(&self.inner.endpoint).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        let products: Vec<Product> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })?;

        debug!(count = products.len(), "Fetched product list");
        Ok(products)
    }
}
