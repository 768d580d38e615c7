//! Notes API library.
//!
//! Note CRUD over an in-memory store, an HMAC-verified webhook receiver, and
//! outbound chat / source-hosting integrations behind a retrying JSON client.

pub mod config;
pub mod export;
pub mod http;
pub mod integrations;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;
pub mod store;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
