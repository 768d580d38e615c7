use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::http::server::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    if state.config.features.v2_health {
        Json(json!({ "ok": true, "version": 2 }))
    } else {
        Json(json!({ "ok": true }))
    }
}
