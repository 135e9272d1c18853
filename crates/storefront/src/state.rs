//! Application state shared across handlers.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokoku_core::admin::AdminBoard;
use tokoku_core::product::{Catalog, LocalProducts};
use tokoku_core::review::ReviewBook;

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The shared stores sit behind
/// `RwLock`s; guards must be dropped before the next `.await`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    local_products: RwLock<LocalProducts>,
    reviews: RwLock<ReviewBook>,
    admin: RwLock<AdminBoard>,
}

impl AppState {
    /// Create a new application state with the sample reviews and admin data.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> std::result::Result<Self, CatalogError> {
        Self::with_stores(config, ReviewBook::seeded(), AdminBoard::sample())
    }

    /// Create a state around explicit review and admin stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn with_stores(
        config: StorefrontConfig,
        reviews: ReviewBook,
        admin: AdminBoard,
    ) -> std::result::Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                local_products: RwLock::new(LocalProducts::new()),
                reviews: RwLock::new(reviews),
                admin: RwLock::new(admin),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the demo product API client.
    #[must_use]
    pub fn catalog_client(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Remote products followed by local ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Catalog`] when the product fetch fails.
    pub async fn catalog(&self) -> Result<Catalog> {
        let remote = self.inner.catalog.fetch_products().await?;
        let local = self.local_products()?;
        Ok(Catalog::new(remote.as_ref().clone(), local.list()))
    }

    /// Read access to locally created products.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the lock is poisoned.
    pub fn local_products(&self) -> Result<RwLockReadGuard<'_, LocalProducts>> {
        self.inner
            .local_products
            .read()
            .map_err(|_| poisoned("local products"))
    }

    /// Write access to locally created products.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the lock is poisoned.
    pub fn local_products_mut(&self) -> Result<RwLockWriteGuard<'_, LocalProducts>> {
        self.inner
            .local_products
            .write()
            .map_err(|_| poisoned("local products"))
    }

    /// Read access to the reviews.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the lock is poisoned.
    pub fn reviews(&self) -> Result<RwLockReadGuard<'_, ReviewBook>> {
        self.inner.reviews.read().map_err(|_| poisoned("reviews"))
    }

    /// Write access to the reviews.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the lock is poisoned.
    pub fn reviews_mut(&self) -> Result<RwLockWriteGuard<'_, ReviewBook>> {
        self.inner.reviews.write().map_err(|_| poisoned("reviews"))
    }

    /// Read access to the admin records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the lock is poisoned.
    pub fn admin(&self) -> Result<RwLockReadGuard<'_, AdminBoard>> {
        self.inner.admin.read().map_err(|_| poisoned("admin"))
    }

    /// Write access to the admin records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the lock is poisoned.
    pub fn admin_mut(&self) -> Result<RwLockWriteGuard<'_, AdminBoard>> {
        self.inner.admin.write().map_err(|_| poisoned("admin"))
    }
}

fn poisoned(store: &str) -> AppError {
    AppError::Internal(format!("{store} store lock poisoned"))
}
