//! Retry policy for request dispatch.
//!
//! One policy wraps a single dispatch: it re-runs the attempt with
//! exponential backoff while the failure carries a retryable HTTP status, and
//! returns every other outcome as soon as it is observed.

use crate::error::{CrmaError, CrmaResult};
use log::{debug, warn};
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;

/// Total attempts, including the first one.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

fn is_bad_gateway(status: StatusCode) -> bool {
    status == StatusCode::BAD_GATEWAY
}

/// Exponential backoff retry keyed on response status
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    retry_on: fn(StatusCode) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            retry_on: is_bad_gateway,
        }
    }
}

impl RetryPolicy {
    /// Policy retrying 502 responses
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> CrmaResult<Self> {
        if max_attempts == 0 {
            return Err(CrmaError::invalid_param("max_attempts must be at least 1"));
        }
        Ok(Self {
            max_attempts,
            initial_backoff,
            retry_on: is_bad_gateway,
        })
    }

    /// Replace the retryable-status predicate
    pub fn retry_on(mut self, predicate: fn(StatusCode) -> bool) -> Self {
        self.retry_on = predicate;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the given failed attempt (1-based): `initial * 2^(attempt - 1)`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(1 << exponent)
    }

    fn should_retry(&self, error: &CrmaError) -> bool {
        error
            .status()
            .and_then(|status| StatusCode::from_u16(status).ok())
            .is_some_and(self.retry_on)
    }

    /// Run `attempt` until it succeeds, fails with a non-retryable error, or
    /// the attempt budget is spent
    ///
    /// The closure receives the 1-based attempt number.
    pub async fn execute<T, F, Fut>(&self, mut attempt: F) -> CrmaResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = CrmaResult<T>>,
    {
        let mut number = 1;
        loop {
            match attempt(number).await {
                Err(err) if number < self.max_attempts && self.should_retry(&err) => {
                    let delay = self.backoff(number);
                    warn!(
                        "Retrying after {} (attempt {}/{}), backing off {:?}",
                        err, number, self.max_attempts, delay
                    );
                    tokio::time::sleep(delay).await;
                    number += 1;
                }
                Err(err) => {
                    if number > 1 {
                        debug!("Giving up after {} attempts", number);
                    }
                    return Err(err);
                }
                Ok(value) => {
                    if number > 1 {
                        debug!("Request succeeded on attempt {}", number);
                    }
                    return Ok(value);
                }
            }
        }
    }
}
