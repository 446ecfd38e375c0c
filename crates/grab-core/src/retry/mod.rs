//! Retry and backoff policy.
//!
//! Classifies download errors into retryable and fatal kinds and decides,
//! per attempt, whether the whole download sequence runs again.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
