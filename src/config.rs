//! Client configuration
//!
//! Defaults come from `constants`. A handful of environment variables can
//! override them without a config file:
//!
//! - `MARKET_DATA_BASE_URL`
//! - `MARKET_DATA_TIMEOUT_SECS`
//! - `MARKET_DATA_CACHE_TTL_SECS`

use crate::constants::{CACHE_TTL_SECS, COINGECKO_API_URL, REQUEST_TIMEOUT_SECS, USER_AGENT};
use std::time::Duration;

/// Settings for `MarketDataClient` and its HTTP provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash
    pub base_url: String,
    /// Client-side request timeout
    pub request_timeout: Duration,
    /// Freshness window for cached responses
    pub cache_ttl: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by the `MARKET_DATA_*` environment variables
    ///
    /// Unparseable or zero numeric values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("MARKET_DATA_BASE_URL") {
            config = config.with_base_url(url);
        }
        if let Some(secs) = parse_secs(&lookup, "MARKET_DATA_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_secs(&lookup, "MARKET_DATA_CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(secs);
        }

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = lookup(name)?;
    match raw.trim().parse::<u64>() {
        Ok(0) => {
            tracing::warn!(variable = name, "Ignoring zero duration setting");
            None
        }
        Ok(secs) => Some(secs),
        Err(e) => {
            tracing::warn!(variable = name, value = %raw, error = %e, "Ignoring invalid setting");
            None
        }
    }
}
