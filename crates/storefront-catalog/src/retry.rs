//! Retry with exponential back-off and jitter for backend reads.
//!
//! [`retry_with_backoff`] wraps a fallible async operation and retries on
//! transient errors. Anything that would fail the same way again (404,
//! conflicts, bad JSON, validation) is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::CatalogError;

/// Upper bound on any single back-off sleep.
const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`CatalogError::RateLimited`]: HTTP 429.
/// - [`CatalogError::Http`]: timeout, connection failure.
/// - [`CatalogError::UnexpectedStatus`] with a 5xx status.
pub(crate) fn is_retriable(err: &CatalogError) -> bool {
    match err {
        CatalogError::RateLimited { .. } => true,
        CatalogError::Http(e) => e.is_timeout() || e.is_connect(),
        CatalogError::UnexpectedStatus { status, .. } => *status >= 500,
        CatalogError::Deserialize { .. }
        | CatalogError::NotFound { .. }
        | CatalogError::Conflict { .. }
        | CatalogError::InvalidBaseUrl { .. }
        | CatalogError::Normalization { .. }
        | CatalogError::CustomerNotFound { .. }
        | CatalogError::InvalidReview(_)
        | CatalogError::InvalidEmail(_) => false,
    }
}

/// Computes the sleep before retry number `attempt` (1-based): the larger of
/// `backoff_base_ms * 2^(attempt-1)` ±25 % jitter and any server-requested
/// `Retry-After`, capped at [`MAX_DELAY_MS`].
fn backoff_delay_ms(attempt: u32, backoff_base_ms: u64, err: &CatalogError) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt.saturating_sub(1)).min(10));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (computed.min(MAX_DELAY_MS) as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

    let requested = match err {
        CatalogError::RateLimited { retry_after_secs } => retry_after_secs.saturating_mul(1_000),
        _ => 0,
    };
    jittered.max(requested).min(MAX_DELAY_MS)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// With `max_retries = 3` the operation runs at most 4 times. Non-retriable
/// errors and the last error after exhausting retries are returned as-is.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, CatalogError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = backoff_delay_ms(attempt, backoff_base_ms, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient backend error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
