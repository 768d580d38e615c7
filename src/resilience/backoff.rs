//! Capped exponential backoff.

use std::time::Duration;

/// Delay to sleep after the failed attempt at zero-based index `attempt`.
///
/// `min(base * 2^attempt, max)`, saturating instead of overflowing. No jitter.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.checked_mul(factor).unwrap_or(max).min(max)
}
