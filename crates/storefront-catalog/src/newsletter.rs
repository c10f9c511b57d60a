use storefront_core::{validate_email, SubscribeOutcome};

use crate::client::CatalogClient;
use crate::error::CatalogError;
use crate::types::NewSubscriberRow;

impl CatalogClient {
    /// Adds `email` to the store's newsletter list.
    ///
    /// An address that is already on the list (HTTP 409) is reported as
    /// [`SubscribeOutcome::AlreadySubscribed`].
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidEmail`] if the address is blank or malformed.
    /// - Any other transport error from the insert.
    pub async fn subscribe_newsletter(&self, email: &str) -> Result<SubscribeOutcome, CatalogError> {
        let email = validate_email(email)?;
        let body = NewSubscriberRow {
            email: &email,
            store_id: self.store_id(),
        };

        match self.insert_row("newsletter_subscribers", &body, None).await {
            Ok(()) => {
                tracing::info!(email = %email, "newsletter subscription added");
                Ok(SubscribeOutcome::Subscribed)
            }
            Err(CatalogError::Conflict { .. }) => {
                tracing::debug!(email = %email, "address already subscribed");
                Ok(SubscribeOutcome::AlreadySubscribed)
            }
            Err(e) => Err(e),
        }
    }
}
