//! Static API-key guard for the note routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::security::signature::constant_time_eq;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests whose `x-api-key` does not match `auth.api_key`.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|key| constant_time_eq(key.as_bytes(), state.config.auth.api_key.as_bytes()))
        .unwrap_or(false);

    if authorized {
        return next.run(request).await;
    }

    tracing::warn!(
        path = %request.uri().path(),
        has_key = request.headers().contains_key(API_KEY_HEADER),
        "Rejected request with invalid API key"
    );
    ApiError::InvalidApiKey.into_response()
}
