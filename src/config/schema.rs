//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::resilience::retries::RetryPolicy;

/// Root configuration for the notes API.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Inbound API-key authentication.
    pub auth: AuthConfig,

    /// Inbound webhook verification.
    pub webhook: WebhookConfig,

    /// Outbound HTTP client settings.
    pub http_client: HttpClientConfig,

    /// Retry policy for outbound integration calls.
    pub retries: RetryConfig,

    /// Chat notification integration.
    pub slack: SlackConfig,

    /// Source-hosting API integration.
    pub github: GitHubConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Feature flags.
    pub features: FeatureFlags,

    /// Request limits.
    pub limits: LimitsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Static API key guarding the note routes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Expected value of the `x-api-key` header.
    pub api_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: "dev-key".to_string(),
        }
    }
}

/// Inbound webhook configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Shared secret used to compute `x-signature`.
    pub secret: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: "dev-secret".to_string(),
        }
    }
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Per-attempt request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// User-Agent header sent on every outbound call.
    pub user_agent: String,

    /// Verify TLS certificates.
    pub verify_tls: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 2_000,
            request_timeout_ms: 6_000,
            user_agent: concat!("notes-api/", env!("CARGO_PKG_VERSION")).to_string(),
            verify_tls: true,
        }
    }
}

/// Retry configuration for the resilient requester.
///
/// Every field is optional; missing fields fall back to [`RetryPolicy::default`].
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: Option<u32>,

    /// Base delay for exponential backoff in milliseconds.
    pub base_backoff_ms: Option<u64>,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_backoff_ms: Option<u64>,

    /// Status codes treated as transient.
    pub retry_on_status: Option<Vec<u16>>,
}

impl RetryConfig {
    /// Resolve into a full policy, filling gaps from the defaults.
    pub fn to_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            base_backoff: self
                .base_backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.base_backoff),
            max_backoff: self
                .max_backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.max_backoff),
            retry_on_status: self
                .retry_on_status
                .as_ref()
                .map(|codes| codes.iter().copied().collect())
                .unwrap_or(defaults.retry_on_status),
        }
    }
}

/// Chat notification webhook.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Incoming-webhook URL. Integration is disabled when unset.
    pub webhook_url: Option<String>,

    /// Channel override.
    pub channel: Option<String>,

    /// Display name of the posting bot.
    pub username: String,

    /// Emoji avatar of the posting bot.
    pub icon_emoji: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            channel: None,
            username: "notes-api".to_string(),
            icon_emoji: ":shield:".to_string(),
        }
    }
}

/// Source-hosting REST API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Bearer token. Integration is disabled when unset.
    pub token: Option<String>,

    /// API base URL.
    pub api_base: String,

    /// Repository owner looked up at startup.
    pub demo_owner: Option<String>,

    /// Repository name looked up at startup.
    pub demo_repo: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: "https://api.github.com".to_string(),
            demo_owner: None,
            demo_repo: None,
        }
    }
}

/// Log output style.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log output style.
    pub log_format: LogFormat,

    /// Install the Prometheus recorder and expose `/metrics`.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "notes_api=debug,tower_http=debug".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
        }
    }
}

/// Feature flags. Unknown flags are rejected by serde.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureFlags {
    /// Report `version: 2` from the health endpoint.
    pub v2_health: bool,
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
        }
    }
}
