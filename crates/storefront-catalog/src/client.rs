//! HTTP client for the storefront backend's REST interface.
//!
//! Wraps `reqwest` with the backend's header conventions (`apikey` plus a
//! bearer token), store scoping, status-to-error mapping and retry. The
//! catalog operations themselves live in [`crate::products`],
//! [`crate::reviews`] and [`crate::newsletter`] as further `impl` blocks.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use storefront_core::AppConfig;
use uuid::Uuid;

use crate::error::CatalogError;
use crate::query::Query;
use crate::retry::retry_with_backoff;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// A signed-in shopper acting through the client.
///
/// Requests made with a session send its access token as the bearer token
/// so row-level policies see the shopper rather than the anonymous role.
#[derive(Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub access_token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

/// Client for one store's catalog.
///
/// Use [`CatalogClient::new`] with the loaded [`AppConfig`], or
/// [`CatalogClient::with_base_url`] to point at a mock server in tests.
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    anon_key: String,
    store_id: Uuid,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl CatalogClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CatalogError::InvalidBaseUrl`] if the
    /// configured backend URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, CatalogError> {
        Ok(Self::with_base_url(
            &config.backend_url,
            &config.anon_key,
            config.store_id,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retry_policy(config.max_retries, config.retry_backoff_base_ms))
    }

    /// Creates a client against an explicit REST root such as
    /// `"https://xyz.supabase.co/rest/v1"`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CatalogError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute URL.
    pub fn with_base_url(
        base_url: &str,
        anon_key: &str,
        store_id: Uuid,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `join(table)` appends a segment
        // instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| CatalogError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            anon_key: anon_key.to_owned(),
            store_id,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Overrides the retry policy. `max_retries = 0` disables retries.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn store_id(&self) -> Uuid {
        self.store_id
    }

    /// Starts a query on `table` filtered to this client's store.
    ///
    /// Only tables carrying a `store_id` column are scoped; join and
    /// variant tables are reached through an already-scoped parent.
    pub(crate) fn scoped(&self, table: &str) -> Query {
        Query::table(table).eq("store_id", self.store_id)
    }

    /// Runs a read query and deserializes every returned row.
    ///
    /// Store scoping is the caller's choice, see [`CatalogClient::scoped`]. Transient
    /// failures are retried according to the client's retry policy.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::RateLimited`]: HTTP 429 after all retries.
    /// - [`CatalogError::NotFound`]: HTTP 404 (unknown table).
    /// - [`CatalogError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`CatalogError::Http`]: network or TLS failure after all retries.
    /// - [`CatalogError::Deserialize`]: body does not match `T`.
    pub(crate) async fn get_rows<T: DeserializeOwned>(
        &self,
        query: &Query,
        session: Option<&Session>,
    ) -> Result<Vec<T>, CatalogError> {
        let url = self.build_url(query);
        tracing::debug!(table = query.table_name(), url = %url, "backend read");

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let request = self.authorize(self.client.get(url.clone()), session);
                let response = check_status(request.send().await?, &url, query.table_name())?;
                let body = response.text().await?;
                serde_json::from_str::<Vec<T>>(&body).map_err(|e| CatalogError::Deserialize {
                    context: format!("{} rows", query.table_name()),
                    source: e,
                })
            }
        })
        .await
    }

    /// Runs a read query limited to one row.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::get_rows`].
    pub(crate) async fn get_optional_row<T: DeserializeOwned>(
        &self,
        query: Query,
        session: Option<&Session>,
    ) -> Result<Option<T>, CatalogError> {
        let rows = self.get_rows::<T>(&query.limit(1), session).await?;
        Ok(rows.into_iter().next())
    }

    /// Inserts one row into `table`.
    ///
    /// Inserts are not retried: a request that timed out may still have
    /// been applied.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Conflict`]: HTTP 409 (unique constraint).
    /// - [`CatalogError::RateLimited`], [`CatalogError::NotFound`],
    ///   [`CatalogError::UnexpectedStatus`] and [`CatalogError::Http`] as for reads.
    pub(crate) async fn insert_row<B: Serialize + ?Sized>(
        &self,
        table: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<(), CatalogError> {
        let url = self.table_url(table);
        tracing::debug!(table, url = %url, "backend insert");

        let request = self
            .authorize(self.client.post(url.clone()), session)
            .header("Prefer", "return=minimal")
            .json(body);
        check_status(request.send().await?, &url, table)?;
        Ok(())
    }

    /// Builds the request URL for `query`.
    fn build_url(&self, query: &Query) -> Url {
        let mut url = self.table_url(query.table_name());
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query.pairs() {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    fn table_url(&self, table: &str) -> Url {
        let mut url = self.base_url.clone();
        // `with_base_url` rejects cannot-be-a-base URLs, so this always applies.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(table);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        let token = session.map_or(self.anon_key.as_str(), |s| s.access_token.as_str());
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }
}

/// Maps non-2xx responses to typed errors.
fn check_status(response: Response, url: &Url, table: &str) -> Result<Response, CatalogError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(60);
        return Err(CatalogError::RateLimited { retry_after_secs });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(CatalogError::NotFound {
            resource: url.path().to_owned(),
        });
    }

    if status == StatusCode::CONFLICT {
        return Err(CatalogError::Conflict {
            table: table.to_owned(),
        });
    }

    if !status.is_success() {
        return Err(CatalogError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
