// Aggregator and service configuration

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SOURCES: [&str; 2] = [
    "https://coding-challenge.powerus.de/flight/source1",
    "https://coding-challenge.powerus.de/flight/source2",
];
pub const DEFAULT_TIME_LIMIT_MS: u64 = 1000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

pub const SOURCES_VAR: &str = "FLIGHT_SOURCES";
pub const TIME_LIMIT_VAR: &str = "FLIGHT_TIME_LIMIT_MS";
pub const BIND_ADDR_VAR: &str = "BIND_ADDR";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("No flight sources configured")]
    NoSources,

    #[error("Invalid flight source URL: {0:?}")]
    InvalidSource(String),

    #[error("Invalid time limit: {0}")]
    InvalidTimeLimit(String),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddr(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorConfig {
    // Queried in this order; the result keeps this order too
    pub sources: Vec<String>,
    // Budget for fetching all sources, not per source
    pub time_limit: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|url| url.to_string()).collect(),
            time_limit: Duration::from_millis(DEFAULT_TIME_LIMIT_MS),
        }
    }
}

impl AggregatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }

        for source in &self.sources {
            let is_http = source.starts_with("http://") || source.starts_with("https://");
            if !is_http || source.trim() != source {
                return Err(ConfigError::InvalidSource(source.clone()));
            }
        }

        Ok(())
    }

    /// Reads overrides through `lookup`; anything unset keeps its default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(sources) = lookup(SOURCES_VAR) {
            config.sources = sources
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(time_limit) = lookup(TIME_LIMIT_VAR) {
            let millis = time_limit
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidTimeLimit(format!("{:?}: {}", time_limit, e)))?;
            config.time_limit = Duration::from_millis(millis);
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub aggregator: AggregatorConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr.clone()))?;

        Ok(Self {
            bind_addr,
            aggregator: AggregatorConfig::from_lookup(lookup)?,
        })
    }
}
