//! Cached response types and utilities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached JSON response with its freshness window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    /// The decoded response body
    pub body: serde_json::Value,

    /// When the response was stored
    pub stored_at: DateTime<Utc>,

    /// How long the entry may be served
    pub ttl: Duration,

    /// Number of times this entry has been served
    #[serde(default)]
    pub hits: u64,
}

impl CachedResponse {
    pub fn new(body: serde_json::Value, ttl: Duration) -> Self {
        Self {
            body,
            stored_at: Utc::now(),
            ttl,
            hits: 0,
        }
    }

    /// Age of the entry
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.stored_at)
            .to_std()
            .unwrap_or(Duration::from_secs(0))
    }

    /// Check if the entry outlived its TTL
    pub fn is_expired(&self) -> bool {
        self.age() >= self.ttl
    }

    pub fn is_fresh(&self) -> bool {
        !self.is_expired()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }
}

/// Statistics for the response cache
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,

    /// Requests that skipped the cache because of the bust parameter
    pub bypassed: u64,

    /// Entries dropped because their TTL elapsed
    pub expired: u64,
}

impl CacheStats {
    /// Calculate cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
