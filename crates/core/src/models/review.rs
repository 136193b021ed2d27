//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Identity;
use crate::types::{ProductId, ReviewId, UserId};

/// Highest star rating.
pub const MAX_RATING: u8 = 5;

/// Validation failures for a submitted review.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("Please select a rating between 1 and 5.")]
    RatingOutOfRange,

    #[error("Please write a comment.")]
    EmptyComment,
}

/// A customer's rating and comment on a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    /// Display name; the reviewer's email.
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
}

/// A review as submitted from the product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub product_id: ProductId,
    pub rating: u8,
    pub comment: String,
}

impl NewReview {
    /// Validate the rating and comment.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError`] if the rating is outside `1..=5` or the comment
    /// is blank.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if !(1..=MAX_RATING).contains(&self.rating) {
            return Err(ReviewError::RatingOutOfRange);
        }
        if self.comment.trim().is_empty() {
            return Err(ReviewError::EmptyComment);
        }
        Ok(())
    }

    /// Attach the reviewer and timestamp.
    #[must_use]
    pub fn into_review(self, author: &Identity, millis: i64, now: DateTime<Utc>) -> Review {
        Review {
            id: ReviewId::new(format!("rev-{millis}")),
            product_id: self.product_id,
            user_id: author.id.clone(),
            user_name: author.email.to_string(),
            rating: self.rating,
            comment: self.comment.trim().to_owned(),
            date: now,
        }
    }
}

/// Mean rating, or `None` without reviews.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    #[allow(clippy::cast_precision_loss)]
    let count = reviews.len() as f64;
    Some(f64::from(sum) / count)
}
