pub mod client;
pub mod error;
pub mod newsletter;
pub mod normalize;
pub mod products;
pub mod query;
pub(crate) mod retry;
pub mod reviews;
pub mod types;

pub use client::{CatalogClient, Session};
pub use error::CatalogError;
pub use products::{CollectionPage, SEARCH_RESULT_LIMIT};
pub use query::Query;
