//! Catalog browsing commands.
//!
//! These fetch the remote catalog with the same client and settings as the
//! storefront (`CATALOG_API_URL`, `CATALOG_TIMEOUT_SECS`).

use tokoku_core::pagination::{PRODUCTS_PER_PAGE, paginate};
use tokoku_core::search::{
    ALL_CATEGORIES, SearchFilters, SortOption, categories as list_categories, filter_products,
    price_range,
};
use tokoku_storefront::catalog::CatalogClient;
use tokoku_storefront::config::StorefrontConfig;
use tracing::info;

const TITLE_WIDTH: usize = 48;

/// Print one page of the filtered and sorted catalog.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the catalog cannot be
/// fetched.
pub async fn list(
    search: &str,
    category: &str,
    sort: &str,
    page: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let client = CatalogClient::new(&config.catalog)?;
    let products = client.fetch_products().await?;

    let range = price_range(&products);
    let filters = SearchFilters {
        query: search.trim().to_string(),
        category: category.trim().to_string(),
        min_price: range.min,
        max_price: range.max,
        ..SearchFilters::default()
    };
    let sort = SortOption::parse_or_default(sort);
    let matched = filter_products(&products, &filters, sort);
    let page = paginate(matched, page, PRODUCTS_PER_PAGE);

    info!(
        "{} product(s), page {} of {}, sorted by {}",
        page.total_items,
        page.current,
        page.total_pages,
        sort.label()
    );
    info!(
        "{:>6}  {:<TITLE_WIDTH$}  {:>9}  {:>6}  {}",
        "ID", "TITLE", "PRICE", "RATING", "CATEGORY"
    );
    for product in &page.items {
        info!(
            "{:>6}  {:<TITLE_WIDTH$}  {:>9}  {:>6.1}  {}",
            product.id.as_i32(),
            truncate(&product.title, TITLE_WIDTH),
            product.price.to_string(),
            product.rating.rate,
            product.category
        );
    }

    Ok(())
}

/// Print the categories and the price range of the catalog.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the catalog cannot be
/// fetched.
pub async fn categories() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let client = CatalogClient::new(&config.catalog)?;
    let products = client.fetch_products().await?;

    let range = price_range(&products);
    info!("{} products, prices {} to {}", products.len(), range.min, range.max);
    for category in list_categories(&products) {
        let count = products
            .iter()
            .filter(|p| category == ALL_CATEGORIES || p.category == category)
            .count();
        info!("  {category} ({count})");
    }

    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Backpack", 10), "Backpack");
        assert_eq!(truncate("Fjallraven Foldsack No. 1", 10), "Fjallra...");
    }
}
