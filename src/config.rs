//! Gateway configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use reqwest::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:3333/api";
pub const DEFAULT_UPLOADS_URL: &str = "http://localhost:3333/uploads";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} is not an absolute http(s) URL")]
    InvalidUrl { var: &'static str, value: String },
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),
    #[error("invalid PUBLIFLOW_REQUEST_TIMEOUT_SECS: {0:?} is not a positive number of seconds")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the remote PubliFlow API, without trailing slash.
    pub api_url: String,
    /// Base URL that relative post cover paths resolve against.
    pub uploads_url: String,
    pub port: u16,
    /// Mark session cookies `Secure`.
    pub cookie_secure: bool,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Build typed gateway config from environment variables.
    ///
    /// Optional:
    /// - `PUBLIFLOW_API_URL`: default `http://localhost:3333/api`
    /// - `PUBLIFLOW_UPLOADS_URL`: default `http://localhost:3333/uploads`
    /// - `PORT`: default 3000
    /// - `COOKIE_SECURE`: default false, or true when the API URL is https
    /// - `PUBLIFLOW_REQUEST_TIMEOUT_SECS`: default 30
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = env_url("PUBLIFLOW_API_URL", DEFAULT_API_URL)?;
        let uploads_url = env_url("PUBLIFLOW_UPLOADS_URL", DEFAULT_UPLOADS_URL)?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let cookie_secure = env_bool("COOKIE_SECURE").unwrap_or_else(|| api_url.starts_with("https://"));
        let timeout_secs = match std::env::var("PUBLIFLOW_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self { api_url, uploads_url, port, cookie_secure, request_timeout: Duration::from_secs(timeout_secs) })
    }

    /// Config pointing at an arbitrary backend, used by tests.
    #[cfg(test)]
    pub fn for_backend(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            uploads_url: DEFAULT_UPLOADS_URL.to_owned(),
            port: DEFAULT_PORT,
            cookie_secure: false,
            request_timeout: Duration::from_secs(5),
        }
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_url(var: &'static str, default: &str) -> Result<String, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_owned());
    parse_base_url(var, &raw)
}

pub(crate) fn parse_base_url(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidUrl { var, value: raw.to_owned() }),
    }
}
