//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Generic string key/value store with per-entry TTL.
///
/// Implementations must be thread-safe. Cache failures must never break a
/// request: callers treat an error exactly like a miss.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed, shared across instances
/// - [`crate::infrastructure::cache::MemoryCache`] - process-local map
/// - [`crate::infrastructure::cache::NullCache`] - caching disabled
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the value for `key`, or `Ok(None)` on miss or expiry.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key` for `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Removes `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend label for health reporting.
    fn backend_name(&self) -> &'static str;
}
