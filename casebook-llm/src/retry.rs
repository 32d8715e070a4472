//! Bounded exponential backoff as a [`Transport`] decorator.
//!
//! With the defaults (4 attempts, 1000ms, ×2.0) the waits between attempts are
//! 1s, 2s and 4s. No jitter. A single wait never exceeds [`MAX_DELAY`]. When
//! attempts run out the last error is returned exactly as the inner transport
//! produced it.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{RetryConfig, RetryScope};
use crate::envelope::ResponsesRequest;
use crate::error::LlmError;
use crate::transport::Transport;

/// Upper bound on a single backoff wait.
pub const MAX_DELAY: Duration = Duration::from_secs(3600);

/// Resolved backoff schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    multiplier: f64,
    scope: RetryScope,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            multiplier: if config.multiplier.is_finite() && config.multiplier > 0.0 {
                config.multiplier
            } else {
                1.0
            },
            scope: config.scope,
        }
    }
}

impl RetryPolicy {
    /// Total attempts, at least one.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait after failed attempt `attempt` (1-based):
    /// `initial_delay * multiplier^(attempt - 1)`, capped at [`MAX_DELAY`].
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).map_or(MAX_DELAY, |delay| delay.min(MAX_DELAY))
    }

    /// Whether `err` is eligible for another attempt under this policy's scope.
    #[must_use]
    pub fn should_retry(&self, err: &LlmError) -> bool {
        match self.scope {
            RetryScope::All => true,
            RetryScope::Transient => err.is_transient(),
        }
    }
}

/// Wraps any transport with [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingTransport<T> {
    /// Decorate `inner`.
    #[must_use]
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryingTransport<T> {
    async fn send(&self, request: &ResponsesRequest) -> Result<String, LlmError> {
        let mut attempt = 1;

        loop {
            if attempt > 1 {
                debug!("Retrying LLM call (attempt {}/{})", attempt, self.policy.max_attempts);
            }

            let err = match self.inner.send(request).await {
                Ok(body) => return Ok(body),
                Err(err) => err,
            };

            if !self.policy.should_retry(&err) {
                warn!(attempt, error = %err, "LLM call failed with a non-retryable error");
                return Err(err);
            }
            if attempt >= self.policy.max_attempts {
                warn!(attempts = attempt, error = %err, "LLM retry attempts exhausted");
                return Err(err);
            }
            let delay = self.policy.delay_after(attempt);

            warn!(
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "LLM call failed, backing off"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
