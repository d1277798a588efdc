//! Environment-driven configuration
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Separate cache, quota and timeout settings per gate
//! - 1.1.0: Rate limiter compaction interval
//! - 1.0.0: Initial release

use anyhow::{anyhow, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Cache, quota and timeout settings for one gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSettings {
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub max_requests: usize,
    pub rate_window: Duration,
    pub upstream_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub discord_guild_id: Option<String>,
    pub log_level: String,
    pub translate: GateSettings,
    pub wiki: GateSettings,
    pub compact_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let discord_guild_id = lookup("DISCORD_GUILD_ID").filter(|id| !id.trim().is_empty());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let translate = GateSettings {
            cache_capacity: positive(&lookup, "TRANSLATE_CACHE_CAPACITY", 1000)?,
            cache_ttl: seconds(&lookup, "TRANSLATE_CACHE_TTL_SECS", 3600)?,
            max_requests: positive(&lookup, "TRANSLATE_RATE_LIMIT", 15)?,
            rate_window: seconds(&lookup, "TRANSLATE_RATE_WINDOW_SECS", 60)?,
            upstream_timeout: seconds(&lookup, "TRANSLATE_TIMEOUT_SECS", 10)?,
        };

        let wiki = GateSettings {
            cache_capacity: positive(&lookup, "WIKI_CACHE_CAPACITY", 500)?,
            cache_ttl: seconds(&lookup, "WIKI_CACHE_TTL_SECS", 7200)?,
            max_requests: positive(&lookup, "WIKI_RATE_LIMIT", 10)?,
            rate_window: seconds(&lookup, "WIKI_RATE_WINDOW_SECS", 60)?,
            upstream_timeout: seconds(&lookup, "WIKI_TIMEOUT_SECS", 15)?,
        };

        Ok(Config {
            discord_token,
            discord_guild_id,
            log_level,
            translate,
            wiki,
            compact_interval: seconds(&lookup, "RATE_LIMIT_COMPACT_SECS", 300)?,
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid value for {key}: {e}")),
        None => Ok(default),
    }
}

fn positive<F>(lookup: &F, key: &str, default: usize) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parsed(lookup, key, default)?;
    if value == 0 {
        return Err(anyhow!("{key} must be greater than zero"));
    }
    Ok(value)
}

fn seconds<F>(lookup: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let value: u64 = parsed(lookup, key, default)?;
    if value == 0 {
        return Err(anyhow!("{key} must be greater than zero"));
    }
    Ok(Duration::from_secs(value))
}
