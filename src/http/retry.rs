//! Retry policies for REST calls.

use std::time::Duration;

/// How a single endpoint call reacts to transient failures.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Single attempt. Default for state-changing calls (trade, login, update).
    #[default]
    None,
    /// Retry transport failures, timeouts, 429 and gateway errors.
    /// Used for every read-only GET.
    Idempotent,
    /// Caller-supplied schedule.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// Resolve to a concrete schedule, `None` meaning "do not retry".
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::idempotent()),
            RetryPolicy::Custom(c) => Some(c.clone()),
        }
    }
}

/// Backoff schedule for retried requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// Spread each delay by ±25% to avoid synchronized retries.
    pub jitter: bool,
    /// Response statuses worth another attempt.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    /// Schedule for idempotent GETs. The backend sits on a free-tier host
    /// that cold-starts, so the first delay is generous.
    pub fn idempotent() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = self.backoff_factor.powi(attempt.min(30) as i32);
        let capped = (self.initial_delay.as_millis() as f64 * exp)
            .min(self.max_delay.as_millis() as f64);

        let millis = if self.jitter {
            let spread = capped * 0.25;
            (capped + (rand::random::<f64>() * 2.0 - 1.0) * spread).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(millis as u64)
    }

    /// Delay before retry `attempt` after a 429 carrying `Retry-After`.
    ///
    /// Honors the server's hint when it is longer than the backoff, but never
    /// waits past `max_delay`.
    pub fn delay_with_retry_after(&self, attempt: u32, retry_after_ms: u64) -> Duration {
        self.delay_for_attempt(attempt)
            .max(Duration::from_millis(retry_after_ms))
            .min(self.max_delay)
    }
}
