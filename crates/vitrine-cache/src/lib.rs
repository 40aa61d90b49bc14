//! # Vitrine Cache - time-boxed response cache
//!
//! Catalog responses fetched while building a homepage are kept here so
//! that resolving the same section twice inside the TTL window hits the
//! network once.
//!
//! ## Features
//!
//! - **Pluggable Storage**: any backend implementing [`storage::Storage`]
//! - **Time-boxed Entries**: every entry carries its own TTL (default 5 minutes)
//! - **Cache Busting**: URLs carrying the bust parameter skip the cache
//!
//! ## Example
//!
//! ```rust
//! use vitrine_cache::{ResponseCache, CacheConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = ResponseCache::new(CacheConfig::default());
//!
//!     let key = vitrine_cache::cache_key("/categories", &[]);
//!     cache.set(&key, serde_json::json!([]), Duration::from_secs(60)).await.unwrap();
//!     assert!(cache.get(&key).await.unwrap().is_some());
//! }
//! ```
//!
//! Concurrent identical requests are not coalesced: two misses on the same
//! key before the first write lands both go to the network.

pub mod cache;
pub mod config;
pub mod engine;
pub mod storage;

pub use cache::{CacheStats, CachedResponse};
pub use config::{CacheConfig, StorageBackend};
pub use engine::{cache_key, is_cache_busting, ResponseCache};
