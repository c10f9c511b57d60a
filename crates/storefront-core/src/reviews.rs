use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A published product review, optionally with its author's customer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub customer: Option<ReviewCustomer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCustomer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

impl Review {
    /// Byline for the review: `"First Last"` when both names are known,
    /// otherwise the customer's e-mail. `None` without a customer record.
    #[must_use]
    pub fn author_label(&self) -> Option<String> {
        let customer = self.customer.as_ref()?;
        let first = customer.first_name.as_deref().map(str::trim).unwrap_or("");
        let last = customer.last_name.as_deref().map(str::trim).unwrap_or("");
        if first.is_empty() || last.is_empty() {
            Some(customer.email.clone())
        } else {
            Some(format!("{first} {last}"))
        }
    }
}

/// Aggregate rating shown above the review list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReviewSummary {
    /// Mean rating, `0.0` when there are no reviews.
    pub average_rating: f64,
    pub review_count: usize,
}

impl ReviewSummary {
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let review_count = reviews.len();
        if review_count == 0 {
            return Self {
                average_rating: 0.0,
                review_count,
            };
        }
        let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        #[allow(clippy::cast_precision_loss)]
        let average_rating = f64::from(total) / review_count as f64;
        Self {
            average_rating,
            review_count,
        }
    }

    /// Average rounded to whole stars, half-up.
    #[must_use]
    pub fn rounded_stars(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let stars = self.average_rating.round().clamp(0.0, f64::from(MAX_RATING)) as u8;
        stars
    }

    /// `"1 review"` / `"3 reviews"`.
    #[must_use]
    pub fn count_label(&self) -> String {
        if self.review_count == 1 {
            "1 review".to_string()
        } else {
            format!("{} reviews", self.review_count)
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("rating must be between {MIN_RATING} and {MAX_RATING}, got {0}")]
    RatingOutOfRange(u8),

    #[error("review title cannot be empty")]
    EmptyTitle,

    #[error("review comment cannot be empty")]
    EmptyComment,
}

/// A review as entered by a signed-in shopper, before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub rating: u8,
    pub title: String,
    pub comment: String,
}

impl ReviewDraft {
    /// Checks the draft and returns it with title and comment trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError`] for an out-of-range rating or a blank title or comment.
    pub fn validate(&self) -> Result<ReviewDraft, ReviewError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ReviewError::RatingOutOfRange(self.rating));
        }
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ReviewError::EmptyTitle);
        }
        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err(ReviewError::EmptyComment);
        }
        Ok(ReviewDraft {
            rating: self.rating,
            title: title.to_owned(),
            comment: comment.to_owned(),
        })
    }
}
