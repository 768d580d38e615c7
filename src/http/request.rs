//! Request correlation.
//!
//! # Design Decisions
//! - Request ID assigned as early as possible (outermost layer)
//! - A client-supplied `x-request-id` is kept, not replaced
//! - The ID is echoed on the response and recorded on the request span

use axum::{extract::Request, http::HeaderName};
use tracing::Span;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Root span for one HTTP request.
pub fn make_request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
