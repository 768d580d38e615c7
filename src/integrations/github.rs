//! Source-hosting REST API lookups.

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::GitHubConfig;
use crate::integrations::http_client::{
    JsonRequester, OutboundRequest, ReqwestTransport, RequestError, Transport,
};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub token contains characters not allowed in a header")]
    InvalidToken,

    #[error("invalid GitHub API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Authenticated client for repository and issue lookups.
#[derive(Debug, Clone)]
pub struct GitHubClient<T = ReqwestTransport> {
    requester: JsonRequester<T>,
    api_base: Url,
    authorization: HeaderValue,
}

impl<T: Transport> GitHubClient<T> {
    pub fn new(requester: JsonRequester<T>, token: &str, api_base: &str) -> Result<Self, GitHubError> {
        let api_base =
            Url::parse(api_base).map_err(|e| GitHubError::InvalidBaseUrl(e.to_string()))?;
        if api_base.cannot_be_a_base() {
            return Err(GitHubError::InvalidBaseUrl(api_base.to_string()));
        }
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| GitHubError::InvalidToken)?;
        authorization.set_sensitive(true);

        Ok(Self {
            requester,
            api_base,
            authorization,
        })
    }

    /// Build a client when a token is configured; `Ok(None)` otherwise.
    pub fn from_config(
        requester: JsonRequester<T>,
        config: &GitHubConfig,
    ) -> Result<Option<Self>, GitHubError> {
        match &config.token {
            Some(token) => Self::new(requester, token, &config.api_base).map(Some),
            None => Ok(None),
        }
    }

    /// `GET /repos/{owner}/{repo}`.
    pub async fn get_repo(&self, owner: &str, repo: &str) -> Result<Value, RequestError> {
        let request = self.get(&["repos", owner, repo]);
        self.requester.request(&request).await
    }

    /// Number of the first issue whose title matches exactly.
    pub async fn find_issue_by_title(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
    ) -> Result<Option<u64>, RequestError> {
        let request = self.get(&["repos", owner, repo, "issues"]);
        let data = self.requester.request(&request).await?;
        Ok(issue_number_by_title(&data, title))
    }

    fn get(&self, segments: &[&str]) -> OutboundRequest {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        OutboundRequest::get(url.as_str())
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE))
    }
}

/// Accepts either a bare array or a search-style `{"items": [...]}` object.
fn issue_number_by_title(data: &Value, title: &str) -> Option<u64> {
    let items = data
        .as_array()
        .or_else(|| data.get("items").and_then(Value::as_array))?;
    items
        .iter()
        .find(|it| it.get("title").and_then(Value::as_str) == Some(title))
        .and_then(|it| it.get("number"))
        .and_then(Value::as_u64)
}
