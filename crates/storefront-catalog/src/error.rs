use storefront_core::{NewsletterError, ReviewError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by backend (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("not found: {resource}")]
    NotFound { resource: String },

    #[error("row already exists in {table}")]
    Conflict { table: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid backend URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("normalization error for {table} row {id}: {reason}")]
    Normalization {
        table: &'static str,
        id: String,
        reason: String,
    },

    #[error("no customer profile for user {user_id}")]
    CustomerNotFound { user_id: Uuid },

    #[error("invalid review: {0}")]
    InvalidReview(#[from] ReviewError),

    #[error("invalid newsletter signup: {0}")]
    InvalidEmail(#[from] NewsletterError),
}
