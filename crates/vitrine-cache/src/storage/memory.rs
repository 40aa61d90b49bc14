//! In-memory storage backend for the response cache

use crate::cache::CachedResponse;
use crate::storage::Storage;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage backend
///
/// Entries live in a HashMap behind an async RwLock and are lost when the
/// process exits.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, CachedResponse>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub async fn size(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, entry: CachedResponse) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries.keys().cloned().collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry(body: &str) -> CachedResponse {
        CachedResponse::new(serde_json::json!(body), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_memory_storage_basic() {
        let storage = MemoryStorage::new();

        storage.set("GET /brands", entry("brands")).await.unwrap();

        let retrieved = storage.get("GET /brands").await.unwrap();
        assert_eq!(retrieved.unwrap().body, serde_json::json!("brands"));
        assert!(storage.get("GET /missing").await.unwrap().is_none());

        storage.delete("GET /brands").await.unwrap();
        assert!(storage.get("GET /brands").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_storage_clear_and_keys() {
        let storage = MemoryStorage::new();

        storage.set("a", entry("1")).await.unwrap();
        storage.set("b", entry("2")).await.unwrap();

        let keys = storage.keys().await.unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"a".to_string()));

        storage.clear().await.unwrap();
        assert_eq!(storage.size().await, 0);
    }
}
