//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, request span)
//!     → security::api_key (note / integration routes only)
//!     → health.rs | notes.rs | webhooks.rs | github.rs
//!     → error.rs (failures rendered as {"error": ...})
//! ```

pub mod error;
pub mod github;
pub mod health;
pub mod notes;
pub mod request;
pub mod server;
pub mod webhooks;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer};
