//! Retry with exponential back-off and jitter for `appdetails` fetches.
//!
//! Only transport-level trouble is retried. An answer from Steam that says
//! the app has no data is final.

use std::future::Future;
use std::time::Duration;

use crate::error::AppDetailsError;

/// Returns `true` for errors worth retrying after a back-off delay:
/// timeouts, connection failures, HTTP 429 and HTTP 5xx.
pub(crate) fn is_retriable(err: &AppDetailsError) -> bool {
    match err {
        AppDetailsError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        AppDetailsError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        AppDetailsError::InvalidEndpoint(_)
        | AppDetailsError::Deserialize { .. }
        | AppDetailsError::MissingEntry { .. }
        | AppDetailsError::Unsuccessful { .. }
        | AppDetailsError::MissingData { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The delay before retry `n` is `backoff_base_ms × 2ⁿ⁻¹` with ±25 % jitter,
/// capped at 60 s. With `max_retries = 0` the operation runs exactly once.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, AppDetailsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppDetailsError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "appdetails transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
