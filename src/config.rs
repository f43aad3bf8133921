//! Client configuration
//!
//! `ClientConfig` gathers every tunable of the crate. It deserializes from
//! JSON with defaults for each missing field and can be read from
//! `USERDIR_*` environment variables.

use crate::api::DEFAULT_BASE_URL;
use crate::engine::{EngineConfig, DEFAULT_EVENT_CAPACITY, DEFAULT_PAGE_SIZE};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClientConfig;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Largest page the users API serves
pub const MAX_PAGE_SIZE: u32 = 100;

/// Environment variable names read by [`ClientConfig::from_env`]
pub mod env_vars {
    pub const BASE_URL: &str = "USERDIR_BASE_URL";
    pub const PAGE_SIZE: &str = "USERDIR_PAGE_SIZE";
    pub const TIMEOUT_SECS: &str = "USERDIR_TIMEOUT_SECS";
    pub const MAX_RETRIES: &str = "USERDIR_MAX_RETRIES";
    pub const PROBE_TIMEOUT_MS: &str = "USERDIR_PROBE_TIMEOUT_MS";
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Users requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// One-shot event buffer per subscriber
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Timeout of the TCP reachability probe, in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

fn default_probe_timeout_ms() -> u64 {
    1500
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            event_capacity: default_event_capacity(),
            probe_timeout_ms: default_probe_timeout_ms(),
            http: HttpSettings::default(),
        }
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for idempotent requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// First backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff ceiling in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    200
}

fn default_max_backoff_ms() -> u64 {
    10_000
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Parse config from an inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Invalid client config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Build config from `USERDIR_*` environment variables, defaulting the rest
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(env_vars::BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(value) = lookup(env_vars::PAGE_SIZE) {
            config.page_size = parse_var(env_vars::PAGE_SIZE, &value)?;
        }
        if let Some(value) = lookup(env_vars::TIMEOUT_SECS) {
            config.http.timeout_secs = parse_var(env_vars::TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = lookup(env_vars::MAX_RETRIES) {
            config.http.max_retries = parse_var(env_vars::MAX_RETRIES, &value)?;
        }
        if let Some(value) = lookup(env_vars::PROBE_TIMEOUT_MS) {
            config.probe_timeout_ms = parse_var(env_vars::PROBE_TIMEOUT_MS, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and the base URL
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::config("http.timeout_secs must be positive"));
        }
        self.parsed_base_url()?;
        Ok(())
    }

    /// Base URL as a parsed `Url`
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        match url.scheme() {
            "http" | "https" if url.host_str().is_some() => Ok(url),
            _ => Err(Error::config(format!(
                "base_url must be an http(s) URL with a host, got '{}'",
                self.base_url
            ))),
        }
    }

    /// Timeout of the reachability probe
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Derive the HTTP client configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url.clone())
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_millis(self.http.max_backoff_ms),
            )
            .header("Accept", "application/json");

        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        builder.build()
    }

    /// Derive the engine configuration
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new()
            .with_page_size(self.page_size)
            .with_event_capacity(self.event_capacity)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{name} has an invalid value: '{value}'")))
}
