//! Product review reads and submission.

use storefront_core::{Review, ReviewDraft};
use uuid::Uuid;

use crate::client::{CatalogClient, Session};
use crate::error::CatalogError;
use crate::normalize::normalize_review;
use crate::types::{CustomerIdRow, NewReviewRow, ReviewRow};

impl CatalogClient {
    /// Fetches a product's reviews with their authors, newest first.
    ///
    /// # Errors
    ///
    /// Returns any transport or deserialization error from the read.
    pub async fn fetch_reviews(&self, product_id: Uuid) -> Result<Vec<Review>, CatalogError> {
        let query = self
            .scoped("reviews")
            .select("*,customers(first_name,last_name,email)")
            .eq("product_id", product_id)
            .order("created_at", false);
        let rows: Vec<ReviewRow> = self.get_rows(&query, None).await?;
        Ok(rows.into_iter().map(normalize_review).collect())
    }

    /// Submits a review on behalf of the signed-in shopper.
    ///
    /// The draft is validated before any request is made. The shopper's
    /// customer record is looked up by user id and the review is inserted
    /// under it.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidReview`] if the draft fails validation.
    /// - [`CatalogError::CustomerNotFound`] if the user has no customer record.
    /// - Any transport error from the lookup or insert.
    pub async fn submit_review(
        &self,
        session: &Session,
        product_id: Uuid,
        draft: &ReviewDraft,
    ) -> Result<(), CatalogError> {
        let draft = draft.validate()?;

        let customer: CustomerIdRow = self
            .get_optional_row(
                self.scoped("customers")
                    .select("id")
                    .eq("user_id", session.user_id),
                Some(session),
            )
            .await?
            .ok_or(CatalogError::CustomerNotFound {
                user_id: session.user_id,
            })?;

        let body = NewReviewRow {
            product_id,
            customer_id: customer.id,
            store_id: self.store_id(),
            rating: draft.rating,
            title: &draft.title,
            comment: &draft.comment,
        };
        self.insert_row("reviews", &body, Some(session)).await?;

        tracing::info!(%product_id, customer_id = %customer.id, rating = draft.rating, "review submitted");
        Ok(())
    }
}
