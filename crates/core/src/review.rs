//! Product reviews.
//!
//! Reviews are shared by every visitor and kept in memory. Editing and
//! deleting is limited to the review's author, compared by display name.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::types::{AccountId, ProductId, ReviewId};
use crate::validation::FieldErrors;

pub const MIN_COMMENT_LENGTH: usize = 10;
pub const MAX_COMMENT_LENGTH: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: AccountId,
    pub user_name: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub verified: bool,
}

/// Errors from changing an existing review.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("review not found")]
    NotFound,

    #[error("only the author can change this review")]
    NotOwner,
}

/// Review form input. A rating of 0 means no star was picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: u8,
    pub comment: String,
}

/// A review draft that passed validation. The comment is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReview {
    pub rating: u8,
    pub comment: String,
}

impl ReviewDraft {
    /// Check the rating and comment length.
    ///
    /// # Errors
    ///
    /// Returns inline messages for `rating` and `comment`.
    pub fn validate(&self) -> Result<ValidReview, FieldErrors> {
        let mut errors = FieldErrors::new();
        if !(1..=5).contains(&self.rating) {
            errors.add("rating", "Please select a rating");
        }
        let comment = self.comment.trim();
        let length = comment.chars().count();
        if length < MIN_COMMENT_LENGTH {
            errors.add(
                "comment",
                format!("Please write a review with at least {MIN_COMMENT_LENGTH} characters"),
            );
        } else if length > MAX_COMMENT_LENGTH {
            errors.add(
                "comment",
                format!("Reviews can be at most {MAX_COMMENT_LENGTH} characters"),
            );
        }
        errors.into_result(ValidReview {
            rating: self.rating,
            comment: comment.to_owned(),
        })
    }
}

/// Who is writing a review.
#[derive(Debug, Clone, Copy)]
pub struct Author<'a> {
    pub id: &'a AccountId,
    pub name: &'a str,
}

/// All reviews.
#[derive(Debug, Clone)]
pub struct ReviewBook {
    reviews: Vec<Review>,
}

impl Default for ReviewBook {
    fn default() -> Self {
        Self::seeded()
    }
}

impl ReviewBook {
    /// A book with no reviews.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            reviews: Vec::new(),
        }
    }

    /// The sample reviews every fresh process starts with.
    #[must_use]
    pub fn seeded() -> Self {
        let samples = [
            (
                "1",
                1,
                "user1",
                "John Doe",
                5,
                "Excellent product! Fast delivery and great quality.",
                ymd(2024, 1, 15),
                true,
            ),
            (
                "2",
                1,
                "user2",
                "Jane Smith",
                4,
                "Good value for money. Would recommend!",
                ymd(2024, 1, 10),
                true,
            ),
            (
                "3",
                2,
                "user3",
                "Mike Johnson",
                3,
                "Average product. Could be better.",
                ymd(2024, 1, 8),
                false,
            ),
        ];
        let reviews = samples
            .into_iter()
            .map(
                |(id, product, user, name, rating, comment, date, verified)| Review {
                    id: ReviewId::from(id),
                    product_id: ProductId::new(product),
                    user_id: AccountId::from(user),
                    user_name: name.to_string(),
                    rating,
                    comment: comment.to_string(),
                    date,
                    verified,
                },
            )
            .collect();
        Self { reviews }
    }

    /// Store a new review dated `today`.
    pub fn add(
        &mut self,
        product_id: ProductId,
        author: Author<'_>,
        review: ValidReview,
        today: NaiveDate,
    ) -> Review {
        let review = Review {
            id: ReviewId::new(Uuid::new_v4().to_string()),
            product_id,
            user_id: author.id.clone(),
            user_name: author.name.to_string(),
            rating: review.rating,
            comment: review.comment,
            date: today,
            verified: false,
        };
        self.reviews.push(review.clone());
        review
    }

    /// Replace the rating and comment of the author's own review.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `NotOwner` when the names differ.
    pub fn update(
        &mut self,
        review_id: &ReviewId,
        author: Author<'_>,
        review: ValidReview,
    ) -> Result<Review, ReviewError> {
        let existing = self
            .reviews
            .iter_mut()
            .find(|r| &r.id == review_id)
            .ok_or(ReviewError::NotFound)?;
        if existing.user_name != author.name {
            return Err(ReviewError::NotOwner);
        }
        existing.rating = review.rating;
        existing.comment = review.comment;
        Ok(existing.clone())
    }

    /// Delete the author's own review.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `NotOwner` when the names differ.
    pub fn delete(&mut self, review_id: &ReviewId, author: Author<'_>) -> Result<(), ReviewError> {
        let existing = self
            .reviews
            .iter()
            .find(|r| &r.id == review_id)
            .ok_or(ReviewError::NotFound)?;
        if existing.user_name != author.name {
            return Err(ReviewError::NotOwner);
        }
        self.reviews.retain(|r| &r.id != review_id);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, review_id: &ReviewId) -> Option<&Review> {
        self.reviews.iter().find(|r| &r.id == review_id)
    }

    /// Reviews of a product, newest first.
    #[must_use]
    pub fn for_product(&self, product_id: ProductId) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.date.cmp(&a.date));
        reviews
    }

    /// Mean rating rounded to one decimal, 0 without reviews.
    #[must_use]
    pub fn average_rating(&self, product_id: ProductId) -> f64 {
        let (total, count) = self
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .fold((0_u32, 0_u32), |(total, count), r| {
                (total + u32::from(r.rating), count + 1)
            });
        if count == 0 {
            return 0.0;
        }
        (f64::from(total) / f64::from(count) * 10.0).round() / 10.0
    }

    /// Number of reviews per star, with every star from 1 to 5 present.
    #[must_use]
    pub fn rating_distribution(&self, product_id: ProductId) -> BTreeMap<u8, usize> {
        let mut distribution: BTreeMap<u8, usize> = (1..=5).map(|star| (star, 0)).collect();
        for review in self.reviews.iter().filter(|r| r.product_id == product_id) {
            if let Some(count) = distribution.get_mut(&review.rating) {
                *count += 1;
            }
        }
        distribution
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
