//! Retry policy for outbound calls.
//!
//! # Design Decisions
//! - Policy is an immutable value, applied fresh on every call (no shared budget)
//! - Transport errors are always retried; statuses only when listed
//! - Method idempotency is not considered; callers own that risk

use std::collections::BTreeSet;
use std::time::Duration;

use crate::resilience::backoff::calculate_backoff;

/// Status codes retried when the configuration does not say otherwise.
pub const DEFAULT_RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Bounded retry policy with capped exponential backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Must be at least 1.
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    pub retry_on_status: BTreeSet<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_millis(2000),
            retry_on_status: DEFAULT_RETRY_STATUSES.into_iter().collect(),
        }
    }
}

impl RetryPolicy {
    /// Whether a response with this status should be retried.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    /// Delay after the failed attempt at zero-based index `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_backoff, self.max_backoff)
    }

    /// Attempt count with the `>= 1` floor applied.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
