//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError, aio::ConnectionManager};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis cache shared by every service instance.
///
/// Uses `ConnectionManager` for automatic reconnection. Every command and
/// the initial connection are bounded by the configured timeout. All
/// operations are fail-open: errors (timeouts included) are logged and
/// reported as a miss or a no-op.
pub struct RedisCache {
    client: ConnectionManager,
    timeout: Duration,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established within `timeout`, or the PING fails.
    pub async fn connect(redis_url: &str, timeout: Duration) -> CacheResult<Self> {
        info!(timeout_ms = timeout.as_millis() as u64, "Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = bounded(timeout, ConnectionManager::new(client))
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        bounded(timeout, test_conn.ping::<()>())
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            timeout,
        })
    }
}

/// Runs a Redis command under `timeout`; an elapsed deadline is an error
/// like any other.
async fn bounded<T, F>(timeout: Duration, command: F) -> Result<T, String>
where
    F: Future<Output = Result<T, RedisError>>,
{
    match tokio::time::timeout(timeout, command).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("timed out after {}ms", timeout.as_millis())),
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();

        match bounded(self.timeout, conn.get::<_, Option<String>>(key)).await {
            Ok(value) => {
                debug!(key, hit = value.is_some(), "Redis GET");
                Ok(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Redis GET failed");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.as_secs().max(1);

        match bounded(self.timeout, conn.set_ex::<_, _, ()>(key, value, ttl_seconds)).await {
            Ok(()) => debug!(key, ttl_seconds, "Redis SET"),
            Err(e) => warn!(key, error = %e, "Redis SET failed"),
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();

        match bounded(self.timeout, conn.del::<_, i32>(key)).await {
            Ok(deleted) if deleted > 0 => debug!(key, "Redis DEL"),
            Ok(_) => {}
            Err(e) => warn!(key, error = %e, "Redis DEL failed"),
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        bounded(self.timeout, conn.ping::<()>()).await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_stalled_command_times_out() {
        let stalled = std::future::pending::<Result<(), RedisError>>();

        let err = bounded(Duration::from_millis(250), stalled).await.unwrap_err();

        assert_eq!(err, "timed out after 250ms");
    }

    #[tokio::test]
    async fn test_prompt_command_passes_through() {
        let ready = async { Ok::<_, RedisError>(7) };

        assert_eq!(bounded(Duration::from_millis(250), ready).await, Ok(7));
    }
}
