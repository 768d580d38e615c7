//! Note CRUD, search and export handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::export::{run_export, ExportFormat};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::store::{paginate, Note, NoteInput, Page, PageParams};

/// Maximum search query length, in characters.
pub const MAX_QUERY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    ExportFormat::Json.to_string()
}

fn parse_input(payload: Result<Json<NoteInput>, JsonRejection>) -> Result<NoteInput, ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::InvalidJson(e.body_text()))?;
    input.validate()?;
    Ok(input)
}

fn parse_id(id: Result<Path<u64>, PathRejection>) -> Result<u64, ApiError> {
    id.map(|Path(id)| id).map_err(|_| ApiError::InvalidId)
}

pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<NoteInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let input = parse_input(payload)?;
    let note = state.notes.create(input);
    tracing::info!(note_id = note.id, "Note created");
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn list_notes(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page<Note>>, ApiError> {
    let Query(params) = params.map_err(|_| ApiError::InvalidQuery)?;
    if !params.is_valid() {
        return Err(ApiError::InvalidQuery);
    }
    Ok(Json(paginate(&state.notes.list(), params)))
}

pub async fn search_notes(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let Query(params) = params.map_err(|_| ApiError::InvalidQuery)?;
    let q = params.q.trim();
    if q.is_empty() || q.chars().count() > MAX_QUERY_CHARS {
        return Err(ApiError::InvalidQuery);
    }
    Ok(Json(state.notes.search(q)))
}

pub async fn get_note(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_id(id)?;
    state.notes.get(id).map(Json).ok_or(ApiError::NoteNotFound)
}

pub async fn update_note(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<NoteInput>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_id(id)?;
    let input = parse_input(payload)?;
    let note = state.notes.update(id, input).ok_or(ApiError::NoteNotFound)?;
    tracing::info!(note_id = id, "Note updated");
    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(id)?;
    if state.notes.delete(id) {
        tracing::info!(note_id = id, "Note deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NoteNotFound)
    }
}

pub async fn export_notes(
    State(state): State<AppState>,
    params: Result<Query<ExportParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|_| ApiError::InvalidQuery)?;
    let format: ExportFormat = params.format.parse()?;
    let body = run_export(&state.notes.list(), format)?;
    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}
