//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → GET /metrics (Prometheus scrape, when enabled)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
