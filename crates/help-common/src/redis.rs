/// Redis wrapper with graceful degradation.
///
/// Reads return `Option<T>` and writes return `bool`. On any Redis error the
/// operation logs a warning and reports a miss, so callers recompute from the
/// in-memory knowledge base. The service is fully functional without Redis.
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::warn;

use crate::error::CommonError;

pub struct RedisCache {
    client: Option<redis::Client>,
}

impl RedisCache {
    /// Build a cache for `url`. A missing or invalid URL yields a cache that
    /// no-ops every call.
    pub fn new(url: Option<&str>) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "failed to create redis client, cache disabled"))
                .ok()
        });
        Self { client }
    }

    /// A cache with no backing server. Used when `REDIS_URL` is unset and in tests.
    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Send a PING and surface the failure reason.
    pub async fn ping(&self) -> Result<(), CommonError> {
        let client = self.client.as_ref().ok_or(CommonError::RedisUnavailable)?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    pub async fn is_available(&self) -> bool {
        self.ping().await.is_ok()
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        let client = self.client.as_ref()?;
        client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()
    }

    /// Get a value. `None` if Redis is unavailable or the key doesn't exist.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.connection().await?;
        conn.get::<_, Option<String>>(key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis GET failed"))
            .ok()?
    }

    /// Set a value with a TTL in seconds. Returns `true` if successful.
    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis SETEX failed"))
            .is_ok()
    }

    /// Delete all keys under `prefix` using SCAN (not KEYS, which blocks).
    pub async fn delete_by_prefix(&self, prefix: &str) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };

        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        loop {
            let scanned: Result<(u64, Vec<String>), _> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await;
            let (next_cursor, keys) = match scanned {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, pattern, "redis SCAN failed");
                    return false;
                }
            };

            if !keys.is_empty() {
                if let Err(e) = conn.del::<_, ()>(&keys).await {
                    warn!(error = %e, "redis batch DEL failed during prefix delete");
                    return false;
                }
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        true
    }
}
