//! Review route handlers.
//!
//! Reviews are shared by every visitor. Only the author (matched by username)
//! may edit or delete a review.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tokoku_core::review::{Author, ReviewBook, ReviewDraft, ReviewError};
use tokoku_core::types::{ProductId, ReviewId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireUser;
use crate::routes::parse_product_id;
use crate::routes::products::{ReviewFormState, product_page};
use crate::state::AppState;
use crate::views::Layout;

/// Review form data. A missing star choice arrives as an empty string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub rating: String,
    pub comment: String,
}

impl ReviewForm {
    fn draft(&self) -> ReviewDraft {
        ReviewDraft {
            rating: self.rating.trim().parse().unwrap_or(0),
            comment: self.comment.clone(),
        }
    }
}

/// Add a review to a product.
#[instrument(skip(state, layout, session, user, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    layout: Layout,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Result<Response> {
    let id = parse_product_id(&id)?;
    // 404 for unknown products before touching the review store
    if state.catalog().await?.get(id).is_none() {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    let draft = form.draft();
    match draft.validate() {
        Ok(review) => {
            let today = chrono::Local::now().date_naive();
            let author = Author {
                id: &user.id,
                name: &user.username,
            };
            let created = state.reviews_mut()?.add(id, author, review, today);
            tracing::info!(review_id = %created.id, product_id = %id, "Review added");
            add_breadcrumb("review", "Added review", Some(&[("product_id", &id.to_string())]));
            Ok(Redirect::to(&format!("/products/{id}#reviews")).into_response())
        }
        Err(errors) => {
            let form = ReviewFormState::Invalid {
                rating: draft.rating,
                comment: draft.comment,
                errors,
            };
            product_page(&state, layout, &session, id, form, StatusCode::UNPROCESSABLE_ENTITY)
                .await
        }
    }
}

/// Edit one of the user's reviews.
#[instrument(skip(state, layout, session, user, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    layout: Layout,
    session: Session,
    Path((id, review_id)): Path<(String, String)>,
    Form(form): Form<ReviewForm>,
) -> Result<Response> {
    let id = parse_product_id(&id)?;
    let review_id = ReviewId::from(review_id);
    let draft = form.draft();

    match draft.validate() {
        Ok(review) => {
            let author = Author {
                id: &user.id,
                name: &user.username,
            };
            let mut reviews = state.reviews_mut()?;
            ensure_on_product(&reviews, &review_id, id)?;
            reviews.update(&review_id, author, review)?;
            drop(reviews);
            tracing::info!(review_id = %review_id, "Review updated");
            Ok(Redirect::to(&format!("/products/{id}#reviews")).into_response())
        }
        Err(errors) => {
            let form = ReviewFormState::Editing {
                review_id: review_id.to_string(),
                rating: Some(draft.rating),
                comment: Some(draft.comment),
                errors,
            };
            product_page(&state, layout, &session, id, form, StatusCode::UNPROCESSABLE_ENTITY)
                .await
        }
    }
}

/// Delete one of the user's reviews.
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((id, review_id)): Path<(String, String)>,
) -> Result<Redirect> {
    let id = parse_product_id(&id)?;
    let review_id = ReviewId::from(review_id);
    let author = Author {
        id: &user.id,
        name: &user.username,
    };
    let mut reviews = state.reviews_mut()?;
    ensure_on_product(&reviews, &review_id, id)?;
    reviews.delete(&review_id, author)?;
    drop(reviews);
    tracing::info!(review_id = %review_id, "Review deleted");
    Ok(Redirect::to(&format!("/products/{id}#reviews")))
}

/// A review id only counts under the product it was written for.
fn ensure_on_product(
    reviews: &ReviewBook,
    review_id: &ReviewId,
    product_id: ProductId,
) -> Result<()> {
    match reviews.get(review_id) {
        Some(review) if review.product_id == product_id => Ok(()),
        _ => Err(AppError::Review(ReviewError::NotFound)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_rating_is_zero() {
        let form = ReviewForm {
            rating: String::new(),
            comment: "Works as described".to_string(),
        };
        assert_eq!(form.draft().rating, 0);
        assert!(form.draft().validate().is_err());

        let form = ReviewForm {
            rating: "5".to_string(),
            ..form
        };
        assert!(form.draft().validate().is_ok());
    }

    #[test]
    fn test_review_must_belong_to_product() {
        let reviews = ReviewBook::seeded();
        let first = ReviewId::from("1");
        assert!(ensure_on_product(&reviews, &first, ProductId::new(1)).is_ok());
        assert!(matches!(
            ensure_on_product(&reviews, &first, ProductId::new(2)),
            Err(AppError::Review(ReviewError::NotFound))
        ));
        let missing = ReviewId::from("missing");
        assert!(ensure_on_product(&reviews, &missing, ProductId::new(1)).is_err());
    }
}
