//! Retry and backoff policy for artifact downloads.
//!
//! Classifies fetch failures (timeouts, throttling, connection drops) and
//! decides whether to try again and after how long.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
