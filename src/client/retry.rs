//! Retry policy with exponential backoff

use super::error::RequestError;
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Decides whether a failed attempt is worth repeating
///
/// Closures of the form `Fn(&RequestError) -> bool` implement this trait.
pub trait RetryPredicate: Send + Sync {
    fn is_retryable(&self, error: &RequestError) -> bool;
}

impl<F> RetryPredicate for F
where
    F: Fn(&RequestError) -> bool + Send + Sync,
{
    fn is_retryable(&self, error: &RequestError) -> bool {
        self(error)
    }
}

/// Retry when no response arrived, on 5xx, or on timeouts
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRetryPredicate;

impl RetryPredicate for DefaultRetryPredicate {
    fn is_retryable(&self, error: &RequestError) -> bool {
        if matches!(error, RequestError::Transport { .. }) {
            return true;
        }
        if error.status().is_some_and(|status| status >= 500) {
            return true;
        }
        error.is_timeout()
    }
}

#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    jitter: f64,
    predicate: Arc<dyn RetryPredicate>,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            jitter: 0.0,
            predicate: Arc::new(DefaultRetryPredicate),
        }
    }

    /// Fail on the first error
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Replace the retryability test
    #[must_use = "builder methods return a new value"]
    pub fn with_predicate<P: RetryPredicate + 'static>(mut self, predicate: P) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Spread each delay by up to `fraction` of itself in either direction
    ///
    /// Clamped to `0.0..=1.0`.
    #[must_use = "builder methods return a new value"]
    pub fn with_jitter(mut self, fraction: f64) -> Self {
        self.jitter = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// Delay before retry number `attempt + 1`: `base_delay * 2^attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        let delay = self.base_delay.saturating_mul(factor);
        if self.jitter == 0.0 || delay.is_zero() {
            return delay;
        }
        let spread = rand::thread_rng().gen_range(-self.jitter..=self.jitter);
        delay.mul_f64((1.0 + spread).max(0.0))
    }

    /// Whether the failure of attempt `attempt` (0-based) should be retried
    pub fn should_retry(&self, attempt: u32, error: &RequestError) -> bool {
        !error.is_business() && attempt < self.max_retries && self.predicate.is_retryable(error)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BASE_DELAY)
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("jitter", &self.jitter)
            .finish_non_exhaustive()
    }
}
