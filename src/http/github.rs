//! Source-hosting lookups exposed over HTTP.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::integrations::GitHubClient;

#[derive(Debug, Deserialize)]
pub struct IssueQuery {
    pub title: String,
}

fn client(state: &AppState) -> Result<&GitHubClient, ApiError> {
    state
        .integrations
        .github
        .as_ref()
        .ok_or(ApiError::IntegrationDisabled("GitHub"))
}

fn repo_path(
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<(String, String), ApiError> {
    path.map(|Path(parts)| parts).map_err(|_| ApiError::InvalidQuery)
}

pub async fn get_repo(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let (owner, repo) = repo_path(path)?;
    let data = client(&state)?.get_repo(&owner, &repo).await?;
    Ok(Json(data))
}

pub async fn find_issue(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    query: Result<Query<IssueQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let (owner, repo) = repo_path(path)?;
    let Query(query) = query.map_err(|_| ApiError::InvalidQuery)?;
    let number = client(&state)?
        .find_issue_by_title(&owner, &repo, &query.title)
        .await?;
    Ok(Json(json!({ "title": query.title, "number": number })))
}
