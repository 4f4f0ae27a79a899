//! Bounded retry around operation creation

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::caldera::types::OperationHandle;
use crate::errors::ApiError;

/// Calls `create` up to `max_attempts` times, sleeping the fixed `delay`
/// between attempts. Constant backoff, no jitter.
///
/// Returns the first successful handle, or `None` once every attempt has
/// failed; callers check for absence rather than catch an error.
pub async fn create_with_retry<F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut create: F,
) -> Option<OperationHandle>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<OperationHandle, ApiError>>,
{
    for attempt in 1..=max_attempts {
        match create().await {
            Ok(handle) => return Some(handle),
            Err(e) => warn!("Attempt {}/{} failed: {}", attempt, max_attempts, e),
        }
        if attempt < max_attempts {
            sleep(delay).await;
        }
    }
    None
}
