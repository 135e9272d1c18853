//! Product listing search, filtering and sorting.
//!
//! Everything here is a linear scan over the product list; the catalog is a
//! few dozen products.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::Price;

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "all";

/// Minimum query length (exclusive) before suggestions are offered.
const SUGGESTION_MIN_QUERY: usize = 2;

/// Products with more ratings than this count as in stock.
const IN_STOCK_MIN_RATINGS: u32 = 10;

/// Listing filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub query: String,
    pub category: String,
    pub min_price: Price,
    pub max_price: Price,
    pub min_rating: f64,
    pub in_stock: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
            min_price: Price::ZERO,
            max_price: PriceRange::DEFAULT.max,
            min_rating: 0.0,
            in_stock: false,
        }
    }
}

impl SearchFilters {
    /// Whether the product passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let query = self.query.trim().to_lowercase();
        let matches_query = query.is_empty()
            || product.title.to_lowercase().contains(&query)
            || product.description.to_lowercase().contains(&query);
        let matches_category =
            self.category == ALL_CATEGORIES || product.category == self.category;
        let matches_price = product.price >= self.min_price && product.price <= self.max_price;
        let matches_rating = product.rating.rate >= self.min_rating;
        let matches_stock = !self.in_stock || product.rating.count > IN_STOCK_MIN_RATINGS;

        matches_query && matches_category && matches_price && matches_rating && matches_stock
    }

    /// Whether any filter narrows the listing compared to the full price range.
    #[must_use]
    pub fn is_active(&self, range: PriceRange) -> bool {
        !self.query.trim().is_empty()
            || self.category != ALL_CATEGORIES
            || self.min_price > range.min
            || self.max_price < range.max
            || self.min_rating > 0.0
            || self.in_stock
    }
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    PriceAsc,
    PriceDesc,
    Rating,
    Name,
}

impl SortOption {
    /// Every option, in the order the sort menu shows them.
    pub const ALL: [Self; 4] = [Self::PriceAsc, Self::PriceDesc, Self::Rating, Self::Name];

    /// Query string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Rating => "rating",
            Self::Name => "name",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::Rating => "Highest Rated",
            Self::Name => "Name: A to Z",
        }
    }

    /// Parse a query string value; anything unknown is the default order.
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == value)
            .unwrap_or_default()
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::Rating => b.rating.rate.total_cmp(&a.rating.rate),
            Self::Name => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-dollar bounds of a product list, used for the price inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub min: Price,
    pub max: Price,
}

impl PriceRange {
    /// Range used when there are no products.
    pub const DEFAULT: Self = Self {
        min: Price::ZERO,
        max: Price::new(rust_decimal::Decimal::ONE_THOUSAND),
    };
}

/// Filter then stably sort a product list.
#[must_use]
pub fn filter_products(
    products: &[Product],
    filters: &SearchFilters,
    sort: SortOption,
) -> Vec<Product> {
    let mut matched: Vec<Product> = products
        .iter()
        .filter(|product| filters.matches(product))
        .cloned()
        .collect();
    matched.sort_by(|a, b| sort.compare(a, b));
    matched
}

/// `all` followed by each category in order of first appearance.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for product in products {
        if !categories.contains(&product.category) {
            categories.push(product.category.clone());
        }
    }
    categories
}

/// Floor of the cheapest and ceiling of the most expensive price.
#[must_use]
pub fn price_range(products: &[Product]) -> PriceRange {
    let prices = products.iter().map(|p| p.price);
    match (prices.clone().min(), prices.max()) {
        (Some(min), Some(max)) => PriceRange {
            min: min.floor(),
            max: max.ceil(),
        },
        _ => PriceRange::DEFAULT,
    }
}

/// Search-as-you-type suggestions: matching titles, then matching categories.
#[must_use]
pub fn suggestions(products: &[Product], query: &str, limit: usize) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.chars().count() <= SUGGESTION_MIN_QUERY {
        return Vec::new();
    }

    let titles = products
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&query))
        .map(|p| p.title.clone());
    let categories = categories(products)
        .into_iter()
        .skip(1)
        .filter(|c| c.to_lowercase().contains(&query));

    let mut out: Vec<String> = Vec::with_capacity(limit);
    for suggestion in titles.chain(categories) {
        if out.len() == limit {
            break;
        }
        if !out.contains(&suggestion) {
            out.push(suggestion);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::product::Rating;
    use crate::product::tests::product;

    fn sample() -> Vec<Product> {
        let mut ring = product(3, "Gold Ring", 16800, "jewelery");
        ring.rating = Rating {
            rate: 4.9,
            count: 5,
        };
        let mut drive = product(4, "Portable Hard Drive", 6499, "electronics");
        drive.rating = Rating {
            rate: 3.3,
            count: 203,
        };
        vec![
            product(1, "Backpack", 10995, "men's clothing"),
            product(2, "cotton jacket", 5599, "men's clothing"),
            ring,
            drive,
        ]
    }

    fn ids(products: &[Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_default_filters_keep_everything_sorted_by_price() {
        let result = filter_products(&sample(), &SearchFilters::default(), SortOption::default());
        assert_eq!(ids(&result), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_query_matches_title_or_description_ignoring_case() {
        let filters = SearchFilters {
            query: "BACKPACK".to_string(),
            ..SearchFilters::default()
        };
        assert_eq!(ids(&filter_products(&sample(), &filters, SortOption::Name)), vec![1]);

        let filters = SearchFilters {
            query: "ring desc".to_string(),
            ..SearchFilters::default()
        };
        assert_eq!(ids(&filter_products(&sample(), &filters, SortOption::Name)), vec![3]);
    }

    #[test]
    fn test_category_price_rating_and_stock_filters() {
        let products = sample();

        let by_category = SearchFilters {
            category: "men's clothing".to_string(),
            ..SearchFilters::default()
        };
        assert_eq!(
            ids(&filter_products(&products, &by_category, SortOption::PriceDesc)),
            vec![1, 2]
        );

        let by_price = SearchFilters {
            min_price: Price::from(60),
            max_price: Price::from_cents(10995),
            ..SearchFilters::default()
        };
        assert_eq!(ids(&filter_products(&products, &by_price, SortOption::PriceAsc)), vec![4, 1]);

        let by_rating = SearchFilters {
            min_rating: 4.5,
            ..SearchFilters::default()
        };
        assert_eq!(ids(&filter_products(&products, &by_rating, SortOption::PriceAsc)), vec![3]);

        let in_stock = SearchFilters {
            in_stock: true,
            ..SearchFilters::default()
        };
        assert_eq!(
            ids(&filter_products(&products, &in_stock, SortOption::PriceAsc)),
            vec![2, 4, 1]
        );
    }

    #[test]
    fn test_sort_orders() {
        let products = sample();
        let all = SearchFilters::default();
        assert_eq!(ids(&filter_products(&products, &all, SortOption::Rating)), vec![3, 1, 2, 4]);
        assert_eq!(ids(&filter_products(&products, &all, SortOption::Name)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_rating_sort_is_stable() {
        let products = vec![
            product(1, "A", 100, "x"),
            product(2, "B", 100, "x"),
            product(3, "C", 100, "x"),
        ];
        let result = filter_products(&products, &SearchFilters::default(), SortOption::Rating);
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_option_parsing_falls_back() {
        assert_eq!(SortOption::parse_or_default("rating"), SortOption::Rating);
        assert_eq!(SortOption::parse_or_default("price-desc"), SortOption::PriceDesc);
        assert_eq!(SortOption::parse_or_default("newest"), SortOption::PriceAsc);
        assert_eq!(SortOption::Name.to_string(), "name");
    }

    #[test]
    fn test_categories_in_first_appearance_order() {
        assert_eq!(
            categories(&sample()),
            vec!["all", "men's clothing", "jewelery", "electronics"]
        );
        assert_eq!(categories(&[]), vec!["all"]);
    }

    #[test]
    fn test_price_range_rounds_outwards() {
        let range = price_range(&sample());
        assert_eq!(range.min, Price::from(55));
        assert_eq!(range.max, Price::from(168));
        assert_eq!(price_range(&[]), PriceRange::DEFAULT);
        assert_eq!(PriceRange::DEFAULT.max, Price::from(1000));
    }

    #[test]
    fn test_is_active_relative_to_range() {
        let range = price_range(&sample());
        let neutral = SearchFilters {
            min_price: range.min,
            max_price: range.max,
            ..SearchFilters::default()
        };
        assert!(!neutral.is_active(range));
        assert!(!SearchFilters::default().is_active(range));

        let narrowed = SearchFilters {
            max_price: Price::from(100),
            ..neutral.clone()
        };
        assert!(narrowed.is_active(range));

        let stocked = SearchFilters {
            in_stock: true,
            ..neutral
        };
        assert!(stocked.is_active(range));
    }

    #[test]
    fn test_suggestions() {
        let products = sample();
        assert!(suggestions(&products, "ba", 5).is_empty());
        assert_eq!(suggestions(&products, "bac", 5), vec!["Backpack"]);
        assert_eq!(suggestions(&products, "ELEC", 5), vec!["electronics"]);
        assert_eq!(suggestions(&products, "men", 5), vec!["men's clothing"]);
        assert_eq!(suggestions(&products, "r", 5), Vec::<String>::new());
        assert_eq!(suggestions(&products, "o", 1).len(), 0);
        assert_eq!(suggestions(&products, "ing", 1), vec!["Gold Ring"]);
    }
}
