//! Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Top-level configuration, loadable from TOML. Every field has a default
/// so an empty or missing file still yields a working setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

/// Upstream resort API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the resort/weather/country API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per call (1 = no retries).
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Backoff between attempts, multiplied by the attempt number.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

/// Cache expiry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

/// Orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Max concurrent per-resort detail fetches for one page.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,

    /// Page size used when ranking recommendations.
    #[serde(default = "default_recommend_limit")]
    pub recommend_limit: u32,
}

fn default_base_url() -> String {
    "https://ski-query-worker.3we.org".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    250
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_detail_concurrency() -> usize {
    8
}

fn default_recommend_limit() -> u32 {
    50
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            detail_concurrency: default_detail_concurrency(),
            recommend_limit: default_recommend_limit(),
        }
    }
}

impl AppConfig {
    /// Load from a TOML file; a missing file falls back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }
}
