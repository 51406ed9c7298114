//! Reusable retry policy for network-bound operations.
//!
//! Wraps backon's exponential backoff behind a small policy object so every
//! network call shares the same attempt budget and retryability rules.

use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::RetryConfig;
use crate::error::NavigationError;

/// Bounded exponential backoff; only [`NavigationError::is_retryable`]
/// failures are re-attempted.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500), Duration::from_secs(10))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    fn strategy(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts)
    }

    /// Run `op`, retrying transient failures with exponential backoff.
    /// Non-retryable failures are rethrown immediately.
    pub async fn run<T, F, Fut>(&self, label: &str, op: F) -> Result<T, NavigationError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NavigationError>>,
    {
        op.retry(self.strategy())
            .when(NavigationError::is_retryable)
            .notify(|err: &NavigationError, dur: Duration| {
                warn!("retrying {label} after {dur:?}: {err}");
            })
            .await
    }
}
