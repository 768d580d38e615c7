//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and URLs. Every
//! problem is reported, not just the first.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("retries.max_attempts must be at least 1")]
    MaxAttempts,

    #[error("retries.base_backoff_ms must be greater than 0")]
    BaseBackoff,

    #[error("retries.max_backoff_ms must be >= base_backoff_ms")]
    MaxBackoff,

    #[error("retries.retry_on_status contains invalid status code {0}")]
    StatusCode(u16),

    #[error("{field} is not an absolute http(s) URL: {value:?}")]
    Url { field: &'static str, value: String },

    #[error("limits.{field} must be greater than 0")]
    Limit { field: &'static str },
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.auth.api_key.is_empty() {
        errors.push(ValidationError::Empty { field: "auth.api_key" });
    }
    if config.webhook.secret.is_empty() {
        errors.push(ValidationError::Empty { field: "webhook.secret" });
    }

    let policy = config.retries.to_policy();
    if policy.max_attempts == 0 {
        errors.push(ValidationError::MaxAttempts);
    }
    if policy.base_backoff.is_zero() {
        errors.push(ValidationError::BaseBackoff);
    }
    if policy.max_backoff < policy.base_backoff {
        errors.push(ValidationError::MaxBackoff);
    }
    for code in &policy.retry_on_status {
        if !(100..=599).contains(code) {
            errors.push(ValidationError::StatusCode(*code));
        }
    }

    if let Some(url) = &config.slack.webhook_url {
        check_url("slack.webhook_url", url, &mut errors);
    }
    check_url("github.api_base", &config.github.api_base, &mut errors);

    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::Limit { field: "request_timeout_secs" });
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Limit { field: "max_body_bytes" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let ok = Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false);
    if !ok {
        errors.push(ValidationError::Url {
            field,
            value: value.to_string(),
        });
    }
}
