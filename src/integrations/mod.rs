//! Outbound integrations subsystem.
//!
//! # Data Flow
//! ```text
//! route handler / startup task
//!     → slack.rs | github.rs (build request, auth headers)
//!     → http_client.rs (attempt loop, backoff, JSON decode)
//!     → Transport (reqwest in production, scripted in tests)
//! ```
//!
//! # Design Decisions
//! - Every integration is optional and disabled when its credentials are unset
//! - All clients share one pooled `reqwest::Client` and one retry policy
//! - Startup calls run in the background and only log failures

pub mod github;
pub mod http_client;
pub mod slack;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::AppConfig;

pub use github::{GitHubClient, GitHubError};
pub use http_client::{
    JsonRequester, OutboundRequest, RequestError, ReqwestTransport, Transport, TransportError,
};
pub use slack::SlackNotifier;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    GitHub(#[from] GitHubError),
}

/// Configured outbound clients.
#[derive(Debug, Clone)]
pub struct Integrations {
    pub slack: SlackNotifier,
    pub github: Option<GitHubClient>,
    demo_repo: Option<(String, String)>,
}

impl Integrations {
    pub fn from_config(config: &AppConfig) -> Result<Self, IntegrationError> {
        let transport = ReqwestTransport::new(&config.http_client)?;
        let requester = JsonRequester::new(transport, config.retries.to_policy());

        let slack = SlackNotifier::new(requester.clone(), config.slack.clone());
        let github = GitHubClient::from_config(requester, &config.github)?;
        let demo_repo = config
            .github
            .demo_owner
            .clone()
            .zip(config.github.demo_repo.clone());

        Ok(Self {
            slack,
            github,
            demo_repo,
        })
    }

    /// Announce startup and warm the demo repository lookup.
    pub fn spawn_startup_tasks(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            if this.slack.is_configured() {
                match this.slack.send("notes-api started").await {
                    Ok(_) => tracing::info!("Startup notification sent"),
                    Err(e) => tracing::warn!(error = %e, "Startup notification failed"),
                }
            }

            if let (Some(github), Some((owner, repo))) = (&this.github, &this.demo_repo) {
                match github.get_repo(owner, repo).await {
                    Ok(data) => tracing::info!(
                        owner = %owner,
                        repo = %repo,
                        full_name = data.get("full_name").and_then(|v| v.as_str()).unwrap_or("?"),
                        "Demo repository resolved"
                    ),
                    Err(e) => tracing::warn!(owner = %owner, repo = %repo, error = %e, "Demo repository lookup failed"),
                }
            }
        })
    }
}
