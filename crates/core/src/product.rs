//! Products: the remote catalog snapshot plus products added locally.
//!
//! Remote products come from the demo catalog API. Local products are created
//! through the dashboard form, get ids starting at [`LOCAL_ID_START`], and live
//! only as long as the process.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::{Price, ProductId};
use crate::validation::{FieldErrors, ValidationError, length_between, required};

/// Categories offered by the product form.
pub const CATEGORIES: [&str; 4] = [
    "electronics",
    "jewelery",
    "men's clothing",
    "women's clothing",
];

/// First id handed out to a locally created product.
pub const LOCAL_ID_START: i32 = 10_000;

const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 2_000;

/// Aggregate rating as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average stars, 0 to 5.
    pub rate: f64,
    /// Number of ratings. Also used as the stock signal by the in-stock filter.
    pub count: u32,
}

/// A product as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
}

impl Product {
    /// Whether the product was created locally rather than fetched.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.id.as_i32() >= LOCAL_ID_START
    }
}

/// Raw product form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
}

/// Validated product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub title: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    pub image: String,
}

impl ProductDraft {
    /// Prefill the form from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price.amount().to_string(),
            description: product.description.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
        }
    }

    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns all failing fields at once.
    pub fn validate(&self) -> Result<ProductFields, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = errors.check(length_between("title", &self.title, 1, MAX_TITLE_LENGTH));
        let price = errors.check(validate_price(&self.price));
        let description = errors.check(length_between(
            "description",
            &self.description,
            1,
            MAX_DESCRIPTION_LENGTH,
        ));
        let category = errors.check(validate_category(&self.category));
        let image = errors.check(validate_image_url(&self.image));

        match (title, price, description, category, image) {
            (Some(title), Some(price), Some(description), Some(category), Some(image))
                if errors.is_empty() =>
            {
                Ok(ProductFields {
                    title: title.to_owned(),
                    price,
                    description: description.to_owned(),
                    category: category.to_owned(),
                    image,
                })
            }
            _ => Err(errors),
        }
    }
}

fn validate_price(raw: &str) -> Result<Price, ValidationError> {
    let raw = required("price", raw)?;
    let price = raw
        .parse::<Price>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "price",
            reason: "must be a number".to_string(),
        })?;
    if !price.is_positive() {
        return Err(ValidationError::InvalidFormat {
            field: "price",
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Price::new(price.amount().round_dp(2)))
}

fn validate_category(raw: &str) -> Result<&str, ValidationError> {
    let raw = required("category", raw)?;
    CATEGORIES
        .iter()
        .find(|category| **category == raw)
        .copied()
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "category",
            reason: format!("must be one of: {}", CATEGORIES.join(", ")),
        })
}

fn validate_image_url(raw: &str) -> Result<String, ValidationError> {
    let raw = required("image", raw)?;
    let invalid = || ValidationError::InvalidFormat {
        field: "image",
        reason: "must be an http or https URL".to_string(),
    };
    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url.to_string())
}

/// Products created through the dashboard.
#[derive(Debug, Clone)]
pub struct LocalProducts {
    items: Vec<Product>,
    next_id: i32,
}

impl Default for LocalProducts {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalProducts {
    /// An empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: LOCAL_ID_START,
        }
    }

    /// All local products in creation order.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.items
    }

    /// Look up a local product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    /// Create a product with the next local id and no ratings yet.
    pub fn add(&mut self, fields: ProductFields) -> Product {
        let product = Product {
            id: ProductId::new(self.next_id),
            title: fields.title,
            price: fields.price,
            description: fields.description,
            category: fields.category,
            image: fields.image,
            rating: Rating::default(),
        };
        self.next_id += 1;
        self.items.push(product.clone());
        product
    }

    /// Replace the editable fields of a local product. The rating is kept.
    pub fn update(&mut self, id: ProductId, fields: ProductFields) -> Option<Product> {
        let product = self.items.iter_mut().find(|p| p.id == id)?;
        product.title = fields.title;
        product.price = fields.price;
        product.description = fields.description;
        product.category = fields.category;
        product.image = fields.image;
        Some(product.clone())
    }

    /// Remove a local product. Returns whether it existed.
    pub fn delete(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.id != id);
        self.items.len() != before
    }
}

/// A read view over remote and local products.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Remote products first, then local ones.
    #[must_use]
    pub fn new(remote: Vec<Product>, local: &[Product]) -> Self {
        let mut products = remote;
        products.extend_from_slice(local);
        Self { products }
    }

    /// Every product.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id in either list.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Up to `limit` other products from the same category.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .cloned()
            .collect()
    }
}
