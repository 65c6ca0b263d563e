pub mod schedule;
pub mod watch;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};

use choreboard_config::constants::CHOREBOARD_USER_ID;
use choreboard_config::ClientConfig;

/// Member id from the flag, falling back to configuration
pub fn resolve_user(config: &ClientConfig, user: Option<String>) -> Result<String> {
    user.or_else(|| config.user_id.clone())
        .ok_or_else(|| anyhow!("No member given. Pass --user or set {}", CHOREBOARD_USER_ID))
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

pub fn parse_instant(value: Option<&str>) -> Result<NaiveDateTime> {
    match value {
        Some(raw) => NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M")
            .with_context(|| format!("Invalid time '{}', expected \"YYYY-MM-DD HH:MM\"", raw)),
        None => Ok(Local::now().naive_local()),
    }
}

pub fn require_token(config: &ClientConfig) -> Result<String> {
    match &config.token {
        Some(token) => Ok(token.clone()),
        None => bail!(
            "No credential configured. Set {}",
            choreboard_config::constants::CHOREBOARD_TOKEN
        ),
    }
}
