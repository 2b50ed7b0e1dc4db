//! Station configuration, read from the environment.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use stockscan_inventory::DEFAULT_SUCCESS_DISPLAY;
use stockscan_observability::LogFormat;

pub const ENV_API_URL: &str = "STOCKSCAN_API_URL";
pub const ENV_AUTH_TOKEN: &str = "STOCKSCAN_AUTH_TOKEN";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "STOCKSCAN_REQUEST_TIMEOUT_MS";
pub const ENV_SUCCESS_DISPLAY_MS: &str = "STOCKSCAN_SUCCESS_DISPLAY_MS";
pub const ENV_PATCH_KEY_COLUMN: &str = "STOCKSCAN_PATCH_KEY_COLUMN";
pub const ENV_LOG_FORMAT: &str = "STOCKSCAN_LOG_FORMAT";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PATCH_KEY_COLUMN: &str = "sku";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Everything a station needs to talk to one inventory endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationConfig {
    /// Bulk-read URL of the inventory resource; updates go below it.
    pub api_url: Url,
    pub auth_token: Option<String>,
    /// Deadline for each remote call.
    pub request_timeout: Duration,
    /// How long a successful commit is shown before returning to idle.
    pub success_display: Duration,
    /// Column name in the update path (`{api_url}/{column}/{sku}`).
    pub patch_key_column: String,
    /// `pretty` for an attended terminal (default), `json` for log shipping.
    pub log_format: LogFormat,
}

impl StationConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            auth_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            success_display: DEFAULT_SUCCESS_DISPLAY,
            patch_key_column: DEFAULT_PATCH_KEY_COLUMN.to_string(),
            log_format: LogFormat::Pretty,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_API_URL))?;
        let mut config = Self::new(parse_url(raw_url.trim())?);

        config.auth_token = lookup(ENV_AUTH_TOKEN).filter(|t| !t.trim().is_empty());

        if let Some(ms) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            config.request_timeout = parse_millis(ENV_REQUEST_TIMEOUT_MS, &ms)?;
        }
        if let Some(ms) = lookup(ENV_SUCCESS_DISPLAY_MS) {
            config.success_display = parse_millis(ENV_SUCCESS_DISPLAY_MS, &ms)?;
        }
        if let Some(column) = lookup(ENV_PATCH_KEY_COLUMN).filter(|c| !c.trim().is_empty()) {
            config.patch_key_column = column.trim().to_string();
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.log_format = parse_log_format(&format)?;
        }

        Ok(config)
    }
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: ENV_API_URL,
        value: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "pretty" | "" => Ok(LogFormat::Pretty),
        _ => Err(ConfigError::Invalid {
            key: ENV_LOG_FORMAT,
            value: raw.to_string(),
            reason: "expected `json` or `pretty`".to_string(),
        }),
    }
}

fn parse_millis(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let ms: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })?;
    if ms == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_millis(ms))
}
