//! Retry loop: run a closure until success, a fatal error, or an exhausted budget.

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::error::DownloadError;

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// `f` receives the 1-based attempt number. Every attempt starts from
/// scratch; nothing from a failed attempt is carried over. When the policy
/// stops, the last error is returned unchanged.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, DownloadError>
where
    F: FnMut(u32) -> Result<T, DownloadError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => {
                        if kind.is_retryable() {
                            tracing::warn!(attempt, error = %e, ?kind, "retry budget exhausted");
                        } else {
                            tracing::warn!(error = %e, ?kind, "not retrying");
                        }
                        return Err(e);
                    }
                    RetryDecision::RetryAfter(d) => {
                        let remaining = policy.max_attempts() - attempt;
                        tracing::info!(
                            attempt,
                            remaining,
                            delay_ms = d.as_millis() as u64,
                            error = %e,
                            ?kind,
                            "attempt failed, retrying"
                        );
                        if !d.is_zero() {
                            std::thread::sleep(d);
                        }
                        attempt += 1;
                    }
                }
            }
        }
    }
}
