//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// Where the bearer token is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenStoreKind {
    /// A single file under the platform config dir (or `TOUCHLINE_TOKEN_FILE`).
    #[default]
    File,
    /// Process memory only; lost on exit.
    Memory,
    /// Nothing is ever stored; every session starts anonymous.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root including the version prefix, without a trailing slash.
    pub api_url: String,
    pub timeouts: HttpTimeouts,
    pub token_store: TokenStoreKind,
    /// Explicit token file; `None` means the platform default location.
    pub token_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            timeouts: HttpTimeouts::default(),
            token_store: TokenStoreKind::default(),
            token_file: None,
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `TOUCHLINE_API_URL`: default `http://localhost:8000/api/v1`
    /// - `TOUCHLINE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `TOUCHLINE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `TOUCHLINE_TOKEN_STORE`: `file` (default), `memory` or `none`
    /// - `TOUCHLINE_TOKEN_FILE`: override the token file location
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for an unknown token store kind or an
    /// empty API URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = normalize_api_url(
            lookup("TOUCHLINE_API_URL")
                .as_deref()
                .unwrap_or(DEFAULT_API_URL),
        )?;
        let timeouts = HttpTimeouts {
            request_secs: parse_u64(lookup("TOUCHLINE_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("TOUCHLINE_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let token_store = parse_token_store(lookup("TOUCHLINE_TOKEN_STORE").as_deref())?;
        let token_file = lookup("TOUCHLINE_TOKEN_FILE")
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Ok(Self { api_url, timeouts, token_store, token_file })
    }
}

/// Trim whitespace and trailing slashes so endpoint paths can be appended.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when nothing is left after trimming.
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(ConfigError::Parse("TOUCHLINE_API_URL is empty".into()));
    }
    Ok(url.to_owned())
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_token_store(raw: Option<&str>) -> Result<TokenStoreKind, ConfigError> {
    match raw.map(str::trim).unwrap_or("file") {
        "file" => Ok(TokenStoreKind::File),
        "memory" => Ok(TokenStoreKind::Memory),
        "none" => Ok(TokenStoreKind::None),
        other => Err(ConfigError::Parse(format!(
            "unknown TOUCHLINE_TOKEN_STORE '{other}' (expected 'file', 'memory' or 'none')"
        ))),
    }
}
