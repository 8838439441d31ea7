//! Bounded retry with exponential backoff

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::VerifyError;
use crate::utils::{calc_exp_backoff, CooldownOptions};

/// Retry policy for upstream calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first
    pub max_retries: u32,

    /// Delay before the first retry; doubles on every further retry
    pub base_delay: Duration,

    /// Retry 4xx responses other than 429
    pub retry_client_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            retry_client_errors: true,
        }
    }
}

impl RetryPolicy {
    /// Sleep before the given retry (1-indexed)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let cooldown = CooldownOptions {
            base_delay: self.base_delay,
            ..Default::default()
        };
        calc_exp_backoff(&cooldown, retry.saturating_sub(1))
    }
}

/// Run `op` until it succeeds or the policy's attempt budget is spent
pub async fn with_retry<T, Op, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    op: Op,
) -> Result<T, VerifyError>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, VerifyError>>,
{
    with_retry_and_sleep(policy, operation, op, tokio::time::sleep).await
}

/// Same as [`with_retry`], with an injectable sleep function
pub async fn with_retry_and_sleep<T, Op, Fut, S, F>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: Op,
    sleep_fn: S,
) -> Result<T, VerifyError>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, VerifyError>>,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let max_attempts = policy.max_retries.max(1);
    let mut attempt = 1;

    loop {
        debug!("{}: attempt {}/{}", operation, attempt, max_attempts);

        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if attempt >= max_attempts || !err.is_retryable(policy) {
            return Err(VerifyError::RetriesExhausted {
                operation: operation.to_string(),
                attempts: attempt,
                source: Box::new(err),
            });
        }

        let delay = policy.delay_for(attempt);
        warn!(
            "{} failed (attempt {}/{}): {}. Retrying in {}ms",
            operation,
            attempt,
            max_attempts,
            err,
            delay.as_millis()
        );
        sleep_fn(delay).await;
        attempt += 1;
    }
}
