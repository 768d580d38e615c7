//! Inbound webhook receiver.

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::signature::{self, SIGNATURE_HEADER};

/// Verify `x-signature` over the raw body, then accept the JSON payload.
pub async fn demo_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let provided = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    if !signature::verify(state.config.webhook.secret.as_bytes(), &body, provided) {
        metrics::record_webhook("rejected");
        tracing::warn!(
            has_signature = provided.is_some(),
            body_len = body.len(),
            "Webhook signature rejected"
        );
        return Err(ApiError::InvalidSignature);
    }
    metrics::record_webhook("accepted");

    let payload: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;
    let event = payload
        .get("event")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    tracing::info!(event = %event, "Webhook accepted");

    Ok(Json(json!({ "ok": true })))
}
