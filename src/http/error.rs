//! HTTP-facing error type.
//!
//! Every failure leaves the service as `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::integrations::RequestError;
use crate::store::NoteValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid query")]
    InvalidQuery,

    #[error("Invalid note id")]
    InvalidId,

    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error(transparent)]
    Validation(#[from] NoteValidationError),

    #[error("Note not found")]
    NoteNotFound,

    #[error("{0} integration not configured")]
    IntegrationDisabled(&'static str),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] RequestError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidApiKey | ApiError::InvalidSignature => StatusCode::UNAUTHORIZED,
            ApiError::InvalidQuery
            | ApiError::InvalidId
            | ApiError::InvalidJson(_)
            | ApiError::Validation(_)
            | ApiError::Export(ExportError::UnknownFormat(_)) => StatusCode::BAD_REQUEST,
            ApiError::NoteNotFound | ApiError::IntegrationDisabled(_) => StatusCode::NOT_FOUND,
            ApiError::Export(ExportError::Json(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
