//! Request pacing and throttle recovery for the VK API.
//!
//! [`RateLimiter`] keeps a minimum spacing between outbound calls.
//! [`retry_while_throttled`] wraps a single call and repeats it after a fixed
//! pause for as long as VK answers "too many requests"; every other outcome,
//! success or error, is returned to the caller untouched.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{VkError, CODE_TOO_MANY_REQUESTS};

/// Default spacing between requests: 250 ms, i.e. at most 4 requests/second.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(250);

/// Default pause after a "too many requests" answer.
pub const DEFAULT_THROTTLE_BACKOFF: Duration = Duration::from_millis(1500);

/// Enforces a minimum interval between consecutive [`RateLimiter::wait`] calls.
///
/// Owned by a single collection engine; not shared process-wide, so separate
/// engines never delay each other.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Sleeps until `min_interval` has passed since the previous call
    /// returned, then records the current instant.
    ///
    /// Elapsed time is measured afresh on every call, so slow callers never
    /// wait and time already spent sleeping is never counted twice.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}

/// Returns `true` for VK's "too many requests per second" error.
pub(crate) fn is_throttled(err: &VkError) -> bool {
    err.api_code() == Some(CODE_TOO_MANY_REQUESTS)
}

/// Runs `operation` behind the rate limiter, repeating it after `backoff`
/// every time VK reports throttling.
///
/// Retries on throttling are unbounded: the limiter alone cannot rule out
/// bursts, and giving up would silently truncate a wall.
pub(crate) async fn retry_while_throttled<T, F, Fut>(
    limiter: &mut RateLimiter,
    backoff: Duration,
    mut operation: F,
) -> Result<T, VkError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, VkError>>,
{
    let mut attempt = 0u32;
    loop {
        limiter.wait().await;
        match operation().await {
            Err(err) if is_throttled(&err) => {
                attempt = attempt.saturating_add(1);
                tracing::warn!(
                    attempt,
                    backoff = ?backoff,
                    error = %err,
                    "VK rate limit hit; pausing before repeating the request"
                );
                tokio::time::sleep(backoff).await;
            }
            other => return other,
        }
    }
}
