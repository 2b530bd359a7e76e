//! Configuration module
//!
//! Values come from utils/constants.rs; the relay server and client read
//! optional overrides from the environment.

use std::time::Duration;
use tracing::info;

use crate::core::risk_score::WeightTable;
use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_DISPLAY_DELAY_MS, DEFAULT_MAX_CONCURRENCY, DEFAULT_RATE_LIMIT_PER_MINUTE,
    DEFAULT_RELAY_HOST, DEFAULT_RELAY_PORT, DEFAULT_RELAY_TIMEOUT_MS, DEFAULT_RELAY_URL,
    SAFE_DOMAINS,
};

/// Classification engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Immutable weight table
    pub weights: WeightTable,
    /// Known-safe domains (matched exactly or as a parent domain)
    pub safe_domains: Vec<String>,
    /// Delay between classification and showing the dialog
    pub display_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: WeightTable::shipped(),
            safe_domains: SAFE_DOMAINS.iter().map(|d| d.to_string()).collect(),
            display_delay: Duration::from_millis(DEFAULT_DISPLAY_DELAY_MS),
        }
    }
}

/// Relay server and client configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bind host for the relay server
    pub host: String,
    /// Bind port for the relay server
    pub port: u16,
    /// Base URL the client posts predictions to
    pub relay_url: String,
    /// Client request timeout
    pub request_timeout: Duration,
    /// Requests per client per minute
    pub rate_limit_per_minute: u32,
    /// In-flight request cap
    pub max_concurrency: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RELAY_HOST.to_string(),
            port: DEFAULT_RELAY_PORT,
            relay_url: DEFAULT_RELAY_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_RELAY_TIMEOUT_MS),
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl RelayConfig {
    /// Read overrides from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("PAGE_SENTRY_HOST").unwrap_or(defaults.host);

        // Hosting platforms inject PORT; PAGE_SENTRY_PORT is for local runs
        let port = match lookup("PORT").or_else(|| lookup("PAGE_SENTRY_PORT")) {
            Some(raw) => parse_value("PORT", &raw)?,
            None => defaults.port,
        };

        let relay_url = lookup("PAGE_SENTRY_RELAY_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(defaults.relay_url);

        let request_timeout = match lookup("PAGE_SENTRY_RELAY_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(parse_value("PAGE_SENTRY_RELAY_TIMEOUT_MS", &raw)?),
            None => defaults.request_timeout,
        };

        let rate_limit_per_minute = match lookup("PAGE_SENTRY_RATE_LIMIT") {
            Some(raw) => parse_value("PAGE_SENTRY_RATE_LIMIT", &raw)?,
            None => defaults.rate_limit_per_minute,
        };

        let max_concurrency = match lookup("PAGE_SENTRY_MAX_CONCURRENCY") {
            Some(raw) => parse_value::<usize>("PAGE_SENTRY_MAX_CONCURRENCY", &raw)?.max(1),
            None => defaults.max_concurrency,
        };

        let config = Self {
            host,
            port,
            relay_url,
            request_timeout,
            rate_limit_per_minute,
            max_concurrency,
        };
        info!(
            "⚙️ Relay config: {}:{} -> {} (timeout {}ms, {} req/min)",
            config.host,
            config.port,
            config.relay_url,
            config.request_timeout.as_millis(),
            config.rate_limit_per_minute
        );
        Ok(config)
    }

    /// Socket address string for the server
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::config_invalid(key, raw))
}
