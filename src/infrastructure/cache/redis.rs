//! Redis distributed cache implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::{CacheEntryOptions, DistributedCache};
use crate::domain::DomainError;

const DATA_FIELD: &str = "data";
const ABSOLUTE_EXPIRY_FIELD: &str = "absexp";
const SLIDING_WINDOW_FIELD: &str = "sldexp";
const NO_SLIDING_WINDOW: i64 = -1;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Connection timeout
    pub connection_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisCacheConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Sets the connection timeout
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Redis-backed distributed cache
///
/// Each entry is a hash holding the payload, its absolute deadline (unix
/// millis) and its sliding window (millis, -1 when absent). The key TTL is
/// kept at `min(sliding window, time left to the deadline)` and is pushed
/// forward on every hit, so Redis itself enforces both expirations.
#[derive(Clone)]
pub struct RedisDistributedCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisDistributedCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisDistributedCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisDistributedCache {
    /// Connects to Redis
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            DomainError::cache_unavailable("redis", format!("Failed to create Redis client: {}", e))
        })?;

        let connection =
            tokio::time::timeout(config.connection_timeout, ConnectionManager::new(client))
                .await
                .map_err(|_| {
                    DomainError::cache_unavailable(
                        "redis",
                        format!(
                            "Timed out connecting to Redis after {:?}",
                            config.connection_timeout
                        ),
                    )
                })?
                .map_err(|e| {
                    DomainError::cache_unavailable(
                        "redis",
                        format!("Failed to connect to Redis: {}", e),
                    )
                })?;

        Ok(Self { connection, config })
    }

    fn prefix_key(&self, key: &str) -> String {
        prefixed(self.config.key_prefix.as_deref(), key)
    }

    /// Pushes the key TTL forward after a hit; `false` if already past the deadline
    async fn renew(
        &self,
        conn: &mut ConnectionManager,
        prefixed_key: &str,
        absolute_expiry: Option<i64>,
        sliding_window: Option<i64>,
    ) -> Result<bool, DomainError> {
        let Some(absolute_expiry) = absolute_expiry else {
            return Ok(true);
        };

        let now = chrono::Utc::now().timestamp_millis();

        match renewed_ttl_millis(now, absolute_expiry, sliding_window) {
            Some(ttl) if sliding_window.is_some_and(|w| w > 0) => {
                let _: bool = conn.pexpire(prefixed_key, ttl).await.map_err(|e| {
                    DomainError::cache_unavailable(
                        "redis",
                        format!("Failed to renew TTL for key '{}': {}", prefixed_key, e),
                    )
                })?;
                Ok(true)
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DistributedCache for RedisDistributedCache {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let (data, absolute_expiry, sliding_window): (Option<String>, Option<i64>, Option<i64>) =
            redis::cmd("HMGET")
                .arg(&prefixed_key)
                .arg(DATA_FIELD)
                .arg(ABSOLUTE_EXPIRY_FIELD)
                .arg(SLIDING_WINDOW_FIELD)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache_unavailable(
                        "redis",
                        format!("Failed to get key '{}': {}", key, e),
                    )
                })?;

        let Some(data) = data else {
            return Ok(None);
        };

        if self
            .renew(&mut conn, &prefixed_key, absolute_expiry, sliding_window)
            .await?
        {
            Ok(Some(data))
        } else {
            Ok(None)
        }
    }

    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        options: &CacheEntryOptions,
    ) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let now = chrono::Utc::now().timestamp_millis();
        let absolute_expiry = now.saturating_add(duration_millis(options.absolute_ttl));
        let sliding_window = options
            .sliding_ttl
            .map(duration_millis)
            .unwrap_or(NO_SLIDING_WINDOW);
        let ttl = duration_millis(options.renewed_lifetime(options.absolute_ttl)).max(1);

        let fields = [
            (DATA_FIELD, value.to_string()),
            (ABSOLUTE_EXPIRY_FIELD, absolute_expiry.to_string()),
            (SLIDING_WINDOW_FIELD, sliding_window.to_string()),
        ];

        let _: () = redis::pipe()
            .atomic()
            .del(&prefixed_key)
            .ignore()
            .hset_multiple(&prefixed_key, &fields[..])
            .ignore()
            .pexpire(&prefixed_key, ttl)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                DomainError::cache_unavailable(
                    "redis",
                    format!("Failed to set key '{}': {}", key, e),
                )
            })?;

        Ok(())
    }

    async fn refresh(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let (absolute_expiry, sliding_window): (Option<i64>, Option<i64>) = redis::cmd("HMGET")
            .arg(&prefixed_key)
            .arg(ABSOLUTE_EXPIRY_FIELD)
            .arg(SLIDING_WINDOW_FIELD)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                DomainError::cache_unavailable(
                    "redis",
                    format!("Failed to refresh key '{}': {}", key, e),
                )
            })?;

        if absolute_expiry.is_none() {
            return Ok(false);
        }

        self.renew(&mut conn, &prefixed_key, absolute_expiry, sliding_window)
            .await
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let deleted: i32 = conn.del(&prefixed_key).await.map_err(|e| {
            DomainError::cache_unavailable(
                "redis",
                format!("Failed to delete key '{}': {}", key, e),
            )
        })?;

        Ok(deleted > 0)
    }
}

fn prefixed(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, key),
        None => key.to_string(),
    }
}

fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

/// TTL to apply after a hit at `now`, or `None` once the deadline has passed
fn renewed_ttl_millis(now: i64, absolute_expiry: i64, sliding_window: Option<i64>) -> Option<i64> {
    let remaining = absolute_expiry - now;

    if remaining <= 0 {
        return None;
    }

    match sliding_window {
        Some(window) if window > 0 => Some(window.min(remaining)),
        _ => Some(remaining),
    }
}
