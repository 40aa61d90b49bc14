//! Cache configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default lifetime of a cached response: five minutes
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Query parameter that marks a request as cache-busting
pub const DEFAULT_BUST_PARAM: &str = "_t";

/// Response cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL used when callers do not pass one
    pub default_ttl: Duration,

    /// Storage backend
    pub storage: StorageBackend,

    /// Query parameter name that bypasses the cache
    pub bust_param: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            storage: StorageBackend::Memory,
            bust_param: DEFAULT_BUST_PARAM.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-memory storage, scoped to one process
    Memory,
}

/// TOML form of the cache section in vitrine.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTomlConfig {
    /// TTL in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_bust_param")]
    pub bust_param: String,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

fn default_bust_param() -> String {
    DEFAULT_BUST_PARAM.to_string()
}

impl Default for CacheTomlConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            bust_param: default_bust_param(),
        }
    }
}

impl CacheTomlConfig {
    /// Convert TOML config to runtime config
    pub fn to_runtime_config(&self) -> anyhow::Result<CacheConfig> {
        if self.bust_param.trim().is_empty() {
            anyhow::bail!("cache.bust_param must not be empty");
        }

        Ok(CacheConfig {
            default_ttl: Duration::from_secs(self.ttl_secs),
            storage: StorageBackend::Memory,
            bust_param: self.bust_param.clone(),
        })
    }
}
