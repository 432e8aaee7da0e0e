//! Configuration module for the profile form.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the mocked answers API binds to
    pub bind_addr: SocketAddr,
    /// Base URL of an external answers API; when unset the console spawns one in-process
    pub api_url: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Simulated server delay applied to every `/api` request
    pub api_delay: Duration,
    /// How long the form shows its redirect message before navigating to the table
    pub redirect_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            api_url: None,
            log_level: "info".to_string(),
            api_delay: Duration::from_millis(1000),
            redirect_delay: Duration::from_millis(1500),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let bind_addr = match env::var("PROFILE_BIND_ADDR") {
            Ok(raw) => raw.parse().map_err(|_| {
                AppError::Config(format!("Invalid PROFILE_BIND_ADDR format: {}", raw))
            })?,
            Err(_) => defaults.bind_addr,
        };

        let api_url = env::var("PROFILE_API_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let log_level = env::var("PROFILE_LOG_LEVEL").unwrap_or(defaults.log_level);

        let api_delay = millis_from_env("PROFILE_API_DELAY_MS")?.unwrap_or(defaults.api_delay);
        let redirect_delay =
            millis_from_env("PROFILE_REDIRECT_DELAY_MS")?.unwrap_or(defaults.redirect_delay);

        Ok(Self {
            bind_addr,
            api_url,
            log_level,
            api_delay,
            redirect_delay,
        })
    }
}

fn millis_from_env(key: &str) -> Result<Option<Duration>, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| AppError::Config(format!("Invalid {} value: {}", key, raw))),
        Err(_) => Ok(None),
    }
}
