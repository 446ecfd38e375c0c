use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, TLS, etc.).
    Connection,
    /// Any other non-success HTTP status.
    Http(u32),
    /// Local create/open/stat/delete/write failure.
    Storage,
    /// Transfer finished but the file size is wrong.
    Integrity,
    /// Caller error (malformed target). Never retried.
    InvalidInput,
    /// Anything else reported by libcurl.
    Other,
}

impl ErrorKind {
    /// Whether a fresh attempt may succeed where this one failed.
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::InvalidInput)
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Bounded retry budget with optional exponential backoff between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts allowed after the first one fails.
    pub retry_budget: u32,
    /// Base delay for backoff; zero retries immediately.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_budget: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Policy with `retry_budget` immediate retries.
    pub fn with_budget(retry_budget: u32) -> Self {
        Self {
            retry_budget,
            ..Self::default()
        }
    }

    /// Total attempts this policy allows for one call.
    pub fn max_attempts(&self) -> u32 {
        self.retry_budget.saturating_add(1)
    }

    /// Decide what happens after `attempt` (1-based) failed with `kind`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts() || !kind.is_retryable() {
            return RetryDecision::NoRetry;
        }

        // base * 2^(attempt-1), capped.
        let exp = 1u32 << attempt.saturating_sub(1).min(8);
        let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);
        RetryDecision::RetryAfter(delay)
    }
}
