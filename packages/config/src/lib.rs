// ABOUTME: Client configuration loaded from environment variables
// ABOUTME: Validates numeric settings and fills defaults for local development

pub mod constants;

use std::env;
use std::num::ParseIntError;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use constants::*;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {source}")]
    InvalidNumber {
        name: &'static str,
        #[source]
        source: ParseIntError,
    },
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// REST base URL, without trailing slash
    pub api_url: String,
    /// Server-sent event stream URL
    pub events_url: String,
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub poll_interval: Duration,
    pub max_reconnect_attempts: u32,
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            events_url: format!("{}/events", DEFAULT_API_URL),
            token: None,
            user_id: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup(CHOREBOARD_API_URL) {
            Some(url) if url.trim().is_empty() => return Err(ConfigError::Empty(CHOREBOARD_API_URL)),
            Some(url) => url.trim().trim_end_matches('/').to_string(),
            None => DEFAULT_API_URL.to_string(),
        };

        let events_url = lookup(CHOREBOARD_EVENTS_URL)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| format!("{}/events", api_url));

        let token = non_empty(lookup(CHOREBOARD_TOKEN));
        if token.is_none() {
            warn!("{} not set - realtime updates and authenticated requests will fail", CHOREBOARD_TOKEN);
        }

        let poll_secs = parse_bounded(
            &lookup,
            CHOREBOARD_POLL_INTERVAL_SECS,
            DEFAULT_POLL_INTERVAL_SECS,
            1,
            3600,
        )?;
        let max_reconnect_attempts = parse_bounded(
            &lookup,
            CHOREBOARD_MAX_RECONNECT_ATTEMPTS,
            u64::from(DEFAULT_MAX_RECONNECT_ATTEMPTS),
            1,
            100,
        )? as u32;
        let timeout_secs = parse_bounded(
            &lookup,
            CHOREBOARD_HTTP_TIMEOUT_SECS,
            DEFAULT_HTTP_TIMEOUT_SECS,
            1,
            300,
        )?;

        Ok(Self {
            api_url,
            events_url,
            token,
            user_id: non_empty(lookup(CHOREBOARD_USER_ID)),
            poll_interval: Duration::from_secs(poll_secs),
            max_reconnect_attempts,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bounded<F>(
    lookup: &F,
    name: &'static str,
    default: u64,
    min: u64,
    max: u64,
) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match non_empty(lookup(name)) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|source| ConfigError::InvalidNumber { name, source })?,
        None => return Ok(default),
    };

    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }

    Ok(value)
}
