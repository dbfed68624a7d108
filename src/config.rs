//! Process-wide configuration, read once at startup.

use std::env;
use std::time::Duration;

use crate::constants::{API_BASE_ENV, DEFAULT_API_BASE, POLL_INTERVAL};
use crate::error::ConfigError;

#[derive(Clone, Debug)]
pub struct Config {
    /// API base address without a trailing slash, e.g. `http://localhost:5000/api`
    pub api_base: String,
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: String::from(DEFAULT_API_BASE),
            poll_interval: POLL_INTERVAL,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(API_BASE_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::with_base(&value),
            _ => Ok(Config::default()),
        }
    }

    /// Build a config for the given base address
    pub fn with_base(base: &str) -> Result<Self, ConfigError> {
        let trimmed = base.trim().trim_end_matches('/');
        let url = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidBase {
            value: base.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBase {
                value: base.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(Config {
            api_base: trimmed.to_string(),
            ..Config::default()
        })
    }
}
