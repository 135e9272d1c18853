//! Product route handlers.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tokoku_core::auth::SessionUser;
use tokoku_core::pagination::{PRODUCTS_PER_PAGE, paginate};
use tokoku_core::product::{Catalog, Product};
use tokoku_core::review::{MAX_COMMENT_LENGTH, Review};
use tokoku_core::search::{
    ALL_CATEGORIES, PriceRange, SearchFilters, SortOption, categories, filter_products,
    price_range,
};
use tokoku_core::types::{Price, ProductId};
use tokoku_core::validation::FieldErrors;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::login_url;
use crate::models::session;
use crate::routes::parse_product_id;
use crate::state::AppState;
use crate::views::{Layout, Pagination, ProductCard, stars};

/// Related products shown under a product.
const RELATED_LIMIT: usize = 4;

/// Rating thresholds offered by the listing filter.
const RATING_FILTERS: [u8; 4] = [4, 3, 2, 1];

/// Listing query parameters. Every field is optional; bad values fall back to
/// the defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub q: String,
    pub category: String,
    pub sort: String,
    pub min_price: String,
    pub max_price: String,
    pub min_rating: String,
    pub in_stock: String,
    pub page: String,
}

impl ListingQuery {
    /// Filters for a catalog whose prices span `range`.
    #[must_use]
    pub fn filters(&self, range: PriceRange) -> SearchFilters {
        let category = self.category.trim();
        SearchFilters {
            query: self.q.trim().to_string(),
            category: if category.is_empty() {
                ALL_CATEGORIES.to_string()
            } else {
                category.to_string()
            },
            min_price: Price::from_str(&self.min_price).unwrap_or(range.min),
            max_price: Price::from_str(&self.max_price).unwrap_or(range.max),
            min_rating: self
                .min_rating
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|r| r.is_finite())
                .map_or(0.0, |r| r.clamp(0.0, 5.0)),
            in_stock: matches!(self.in_stock.as_str(), "on" | "true" | "1"),
        }
    }

    #[must_use]
    pub fn sort(&self) -> SortOption {
        SortOption::parse_or_default(&self.sort)
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page.trim().parse().unwrap_or(1)
    }

    /// The listing URL for `page` with every other parameter kept.
    #[must_use]
    pub fn href_for_page(&self, page: usize) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in [
            ("q", &self.q),
            ("category", &self.category),
            ("sort", &self.sort),
            ("min_price", &self.min_price),
            ("max_price", &self.max_price),
            ("min_rating", &self.min_rating),
            ("in_stock", &self.in_stock),
        ] {
            if !value.trim().is_empty() {
                query.append_pair(key, value.trim());
            }
        }
        query.append_pair("page", &page.to_string());
        format!("/products?{}", query.finish())
    }
}

/// A `<select>` option.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
    pub pagination: Pagination,
    pub total_items: usize,
    pub query: String,
    pub categories: Vec<SelectOption>,
    pub sort_options: Vec<SelectOption>,
    pub rating_options: Vec<SelectOption>,
    pub min_price: String,
    pub max_price: String,
    pub range_min: String,
    pub range_max: String,
    pub in_stock: bool,
    pub filters_active: bool,
    /// Where cart and wishlist buttons come back to.
    pub return_to: String,
}

/// Display product listing page.
#[instrument(skip(state, layout, session))]
pub async fn index(
    State(state): State<AppState>,
    layout: Layout,
    session: Session,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog().await?;
    let wishlist = session::load_wishlist(&session).await?;

    let range = price_range(catalog.all());
    let filters = query.filters(range);
    let sort = query.sort();
    let matched = filter_products(catalog.all(), &filters, sort);
    let page = paginate(matched, query.page(), PRODUCTS_PER_PAGE);
    let pagination = Pagination::new(page.current, &page.window(), |n| query.href_for_page(n));

    let categories = categories(catalog.all())
        .into_iter()
        .map(|category| SelectOption {
            selected: category == filters.category,
            label: if category == ALL_CATEGORIES {
                "All categories".to_string()
            } else {
                category.clone()
            },
            value: category,
        })
        .collect();

    let sort_options = SortOption::ALL
        .iter()
        .map(|option| SelectOption {
            value: option.as_str().to_string(),
            label: option.label().to_string(),
            selected: *option == sort,
        })
        .collect();

    let rating_options = std::iter::once(SelectOption {
        value: String::new(),
        label: "Any rating".to_string(),
        selected: filters.min_rating <= 0.0,
    })
    .chain(RATING_FILTERS.iter().map(|&stars| SelectOption {
        value: stars.to_string(),
        label: format!("{stars}+ stars"),
        selected: (filters.min_rating - f64::from(stars)).abs() < f64::EPSILON,
    }))
    .collect();

    Ok(ProductsIndexTemplate {
        layout,
        products: page
            .items
            .iter()
            .map(|p| ProductCard::new(p, &wishlist))
            .collect(),
        pagination,
        total_items: page.total_items,
        query: filters.query.clone(),
        categories,
        sort_options,
        rating_options,
        min_price: filters.min_price.amount().to_string(),
        max_price: filters.max_price.amount().to_string(),
        range_min: range.min.amount().to_string(),
        range_max: range.max.amount().to_string(),
        in_stock: filters.in_stock,
        filters_active: filters.is_active(range),
        return_to: query.href_for_page(page.current),
    })
}

/// Product detail display data.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub id: i32,
    pub title: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub stars: String,
    pub rating: String,
    pub rating_count: u32,
    pub in_wishlist: bool,
    pub cart_quantity: u32,
}

/// A review as listed under the product.
#[derive(Debug, Clone)]
pub struct ReviewView {
    pub id: String,
    pub user_name: String,
    pub stars: String,
    pub comment: String,
    pub date: String,
    pub verified: bool,
    pub can_edit: bool,
    pub editing: bool,
}

/// One bar of the rating distribution.
#[derive(Debug, Clone)]
pub struct DistributionRow {
    pub stars: u8,
    pub count: usize,
    pub percent: usize,
}

/// A star radio button.
#[derive(Debug, Clone)]
pub struct StarChoice {
    pub value: u8,
    pub checked: bool,
}

/// The add or edit review form.
#[derive(Debug, Clone)]
pub struct ReviewFormView {
    pub action: String,
    pub submit_label: String,
    pub choices: Vec<StarChoice>,
    pub comment: String,
    pub max_length: usize,
    pub rating_error: Option<String>,
    pub comment_error: Option<String>,
    pub cancel_href: Option<String>,
}

impl ReviewFormView {
    fn new(action: String, rating: u8, comment: &str, errors: &FieldErrors) -> Self {
        Self {
            action,
            submit_label: "Submit review".to_string(),
            choices: (1..=5)
                .map(|value| StarChoice {
                    value,
                    checked: value == rating,
                })
                .collect(),
            comment: comment.to_string(),
            max_length: MAX_COMMENT_LENGTH,
            rating_error: errors.get("rating").map(String::from),
            comment_error: errors.get("comment").map(String::from),
            cancel_href: None,
        }
    }
}

/// Reviews section of the detail page.
#[derive(Debug, Clone)]
pub struct ReviewsView {
    pub items: Vec<ReviewView>,
    pub count: usize,
    pub average: String,
    pub average_stars: String,
    pub distribution: Vec<DistributionRow>,
    pub new_form: Option<ReviewFormView>,
    pub edit_form: Option<ReviewFormView>,
    pub login_href: String,
}

/// State of the review forms when re-rendering the detail page.
#[derive(Debug, Default)]
pub enum ReviewFormState {
    /// Nothing being written.
    #[default]
    Idle,
    /// A new review failed validation.
    Invalid {
        rating: u8,
        comment: String,
        errors: FieldErrors,
    },
    /// An existing review is open for editing.
    Editing {
        review_id: String,
        rating: Option<u8>,
        comment: Option<String>,
        errors: FieldErrors,
    },
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductDetail,
    pub related: Vec<ProductCard>,
    pub reviews: ReviewsView,
    pub return_to: String,
}

/// Query parameters of the detail page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DetailQuery {
    /// Review to open in edit mode.
    pub edit: String,
}

/// Display product detail page.
#[instrument(skip(state, layout, session))]
pub async fn show(
    State(state): State<AppState>,
    layout: Layout,
    session: Session,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<Response> {
    let id = parse_product_id(&id)?;
    let form = if query.edit.is_empty() {
        ReviewFormState::Idle
    } else {
        ReviewFormState::Editing {
            review_id: query.edit,
            rating: None,
            comment: None,
            errors: FieldErrors::new(),
        }
    };
    product_page(&state, layout, &session, id, form, StatusCode::OK).await
}

/// Render the detail page, optionally with review form errors.
pub(crate) async fn product_page(
    state: &AppState,
    layout: Layout,
    session: &Session,
    id: ProductId,
    form: ReviewFormState,
    status: StatusCode,
) -> Result<Response> {
    let catalog = state.catalog().await?;
    let cart = session::load_cart(session).await?;
    let wishlist = session::load_wishlist(session).await?;

    let product = find_product(&catalog, id)?;
    let related = catalog
        .related(product, RELATED_LIMIT)
        .iter()
        .map(|p| ProductCard::new(p, &wishlist))
        .collect();

    let reviews = {
        let book = state.reviews()?;
        reviews_view(
            id,
            &book.for_product(id),
            book.average_rating(id),
            &book.rating_distribution(id),
            layout.user.as_ref(),
            form,
        )
    };

    let detail = ProductDetail {
        id: product.id.as_i32(),
        title: product.title.clone(),
        price: product.price.to_string(),
        description: product.description.clone(),
        category: product.category.clone(),
        image: product.image.clone(),
        stars: stars(product.rating.rate),
        rating: format!("{:.1}", product.rating.rate),
        rating_count: product.rating.count,
        in_wishlist: wishlist.contains(id),
        cart_quantity: cart.quantity_of(id),
    };

    Ok((
        status,
        ProductShowTemplate {
            layout,
            product: detail,
            related,
            reviews,
            return_to: format!("/products/{id}"),
        },
    )
        .into_response())
}

fn find_product(catalog: &Catalog, id: ProductId) -> Result<&Product> {
    catalog
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

fn reviews_view(
    product_id: ProductId,
    reviews: &[Review],
    average: f64,
    distribution: &std::collections::BTreeMap<u8, usize>,
    user: Option<&SessionUser>,
    form: ReviewFormState,
) -> ReviewsView {
    let count = reviews.len();
    let base = format!("/products/{product_id}");
    let editing_id = match &form {
        ReviewFormState::Editing { review_id, .. } => Some(review_id.as_str()),
        _ => None,
    };

    let mut edit_form = None;
    let items = reviews
        .iter()
        .map(|review| {
            let can_edit = user.is_some_and(|u| u.username == review.user_name);
            let editing = can_edit && editing_id == Some(review.id.as_str());
            if editing {
                if let ReviewFormState::Editing {
                    rating,
                    comment,
                    errors,
                    ..
                } = &form
                {
                    let mut view = ReviewFormView::new(
                        format!("{base}/reviews/{}", review.id),
                        rating.unwrap_or(review.rating),
                        comment.as_deref().unwrap_or(&review.comment),
                        errors,
                    );
                    view.submit_label = "Save changes".to_string();
                    view.cancel_href = Some(base.clone());
                    edit_form = Some(view);
                }
            }
            ReviewView {
                id: review.id.to_string(),
                user_name: review.user_name.clone(),
                stars: stars(f64::from(review.rating)),
                comment: review.comment.clone(),
                date: review.date.format("%B %-d, %Y").to_string(),
                verified: review.verified,
                can_edit,
                editing,
            }
        })
        .collect();

    let new_form = user.map(|_| match &form {
        ReviewFormState::Invalid {
            rating,
            comment,
            errors,
        } => ReviewFormView::new(format!("{base}/reviews"), *rating, comment, errors),
        _ => ReviewFormView::new(format!("{base}/reviews"), 0, "", &FieldErrors::new()),
    });

    let distribution = distribution
        .iter()
        .rev()
        .map(|(&stars, &n)| DistributionRow {
            stars,
            count: n,
            percent: if count == 0 { 0 } else { n * 100 / count },
        })
        .collect();

    ReviewsView {
        items,
        count,
        average: format!("{average:.1}"),
        average_stars: stars(average),
        distribution,
        new_form,
        edit_form,
        login_href: login_url(&base),
    }
}
