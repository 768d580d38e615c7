//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound integration call:
//!     → integrations::http_client (issue attempt)
//!     → retries.rs (classify status / error as transient)
//!     → backoff.rs (capped exponential delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Per-attempt timeouts live on the HTTP client, not around the retry loop
//! - No jitter: delays are exactly reproducible under a paused clock

pub mod backoff;
pub mod retries;

pub use backoff::calculate_backoff;
pub use retries::RetryPolicy;
