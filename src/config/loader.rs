//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{AppConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "NOTES_API_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = read_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the runtime configuration: defaults, then the optional file, then
/// process environment overrides, then validation.
pub fn load_from_env(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let path = path.map(Path::to_path_buf).or(env_path);

    let config = match path {
        Some(p) => read_file(&p)?,
        None => AppConfig::default(),
    };
    let config = apply_env_overrides(config, |var| std::env::var(var).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment-style overrides through `lookup`.
///
/// `lookup` is injected so callers (and tests) control where values come from.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(port) = lookup("PORT") {
        let port: u16 = port.parse().map_err(|_| ConfigError::Env {
            var: "PORT",
            value: port.clone(),
        })?;
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }
    if let Some(key) = non_empty(lookup("API_KEY")) {
        config.auth.api_key = key;
    }
    if let Some(secret) = non_empty(lookup("WEBHOOK_SECRET")) {
        config.webhook.secret = secret;
    }

    if let Some(url) = non_empty(lookup("SLACK_WEBHOOK_URL")) {
        config.slack.webhook_url = Some(url);
    }
    if let Some(channel) = non_empty(lookup("SLACK_CHANNEL")) {
        config.slack.channel = Some(channel);
    }
    if let Some(username) = lookup("SLACK_USERNAME") {
        config.slack.username = username;
    }
    if let Some(icon) = lookup("SLACK_ICON") {
        config.slack.icon_emoji = icon;
    }

    if let Some(token) = non_empty(lookup("GITHUB_TOKEN")) {
        config.github.token = Some(token);
    }
    if let Some(base) = lookup("GITHUB_API_BASE") {
        config.github.api_base = base;
    }
    if let Some(owner) = non_empty(lookup("DEMO_GH_OWNER")) {
        config.github.demo_owner = Some(owner);
    }
    if let Some(repo) = non_empty(lookup("DEMO_GH_REPO")) {
        config.github.demo_repo = Some(repo);
    }

    if let Some(flag) = lookup("METRICS_ENABLED") {
        config.observability.metrics_enabled = flag.eq_ignore_ascii_case("true");
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        config.observability.log_format = match format.to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => {
                return Err(ConfigError::Env {
                    var: "LOG_FORMAT",
                    value: format,
                })
            }
        };
    }
    if let Some(verify) = lookup("HTTP_VERIFY_SSL") {
        config.http_client.verify_tls = !verify.eq_ignore_ascii_case("false");
    }
    if let Some(agent) = non_empty(lookup("APP_USER_AGENT")) {
        config.http_client.user_agent = agent;
    }

    Ok(config)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
