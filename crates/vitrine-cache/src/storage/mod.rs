//! Storage backends for the response cache

use crate::cache::CachedResponse;
use anyhow::Result;
use async_trait::async_trait;

pub mod memory;

/// Trait for response cache storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Get a cached response by key
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>>;

    /// Store a response
    async fn set(&self, key: &str, entry: CachedResponse) -> Result<()>;

    /// Delete a cached response
    async fn delete(&self, key: &str) -> Result<()>;

    /// Clear all cached responses
    async fn clear(&self) -> Result<()>;

    /// Get all cache keys
    async fn keys(&self) -> Result<Vec<String>>;

    /// Get storage backend name
    fn name(&self) -> &'static str;
}
