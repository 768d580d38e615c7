//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Note / integration routes:
//!     → api_key.rs (x-api-key must match the configured key)
//!
//! Inbound webhook:
//!     → signature.rs (HMAC-SHA256 of the raw body vs x-signature)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a missing header is the same as a wrong one
//! - Secrets are compared in constant time

pub mod api_key;
pub mod signature;

pub use api_key::require_api_key;
pub use signature::{sign, verify, verify_prefixed};
