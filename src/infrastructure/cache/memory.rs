//! In-process cache with absolute + sliding expiration and priority eviction

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::cache::{CacheEntryOptions, CachePriority};
use crate::domain::DomainError;

/// Used when `now + ttl` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Configuration for the in-process cache
#[derive(Debug, Clone)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries before eviction kicks in
    pub max_capacity: usize,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl MemoryCacheConfig {
    /// Sets the maximum capacity (at least one entry)
    pub fn with_max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = capacity.max(1);
        self
    }
}

#[derive(Debug, Clone)]
struct MemoryCacheEntry<V> {
    value: V,
    absolute_expiry: Instant,
    sliding_ttl: Option<Duration>,
    last_access: Instant,
    priority: CachePriority,
}

impl<V> MemoryCacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        if now >= self.absolute_expiry {
            return true;
        }

        match self.sliding_ttl {
            Some(window) => now.saturating_duration_since(self.last_access) >= window,
            None => false,
        }
    }
}

/// Thread-safe in-process cache
///
/// Features:
/// - Absolute and sliding expiration per entry
/// - Lazy purge of expired entries on read, optional background sweeping
/// - Bounded capacity: expired entries go first, then the lowest priority,
///   then the least recently used among equal priority
///
/// Time is read from `tokio::time`, so a paused test runtime drives expiry.
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: Mutex<HashMap<String, MemoryCacheEntry<V>>>,
    config: MemoryCacheConfig,
    evictions: AtomicU64,
}

impl<V: Clone> MemoryCache<V> {
    /// Creates a new cache with default configuration
    pub fn new() -> Self {
        Self::with_config(MemoryCacheConfig::default())
    }

    /// Creates a new cache with the given configuration
    pub fn with_config(config: MemoryCacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
            evictions: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &MemoryCacheConfig {
        &self.config
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, MemoryCacheEntry<V>>>, DomainError> {
        self.entries.lock().map_err(|e| {
            DomainError::cache_unavailable("memory", format!("Failed to acquire cache lock: {}", e))
        })
    }

    /// Looks up a live entry, renewing its sliding window on a hit
    pub fn try_get(&self, key: &str) -> Result<Option<V>, DomainError> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        let Some(entry) = entries.get_mut(key) else {
            return Ok(None);
        };

        if entry.is_expired(now) {
            entries.remove(key);
            return Ok(None);
        }

        entry.last_access = now;
        Ok(Some(entry.value.clone()))
    }

    /// Inserts or replaces an entry; the last write wins
    pub fn set(&self, key: &str, value: V, options: &CacheEntryOptions) -> Result<(), DomainError> {
        let now = Instant::now();
        let absolute_expiry = now
            .checked_add(options.absolute_ttl)
            .unwrap_or_else(|| now + FAR_FUTURE);

        let mut entries = self.lock()?;

        if !entries.contains_key(key) && entries.len() >= self.config.max_capacity {
            self.make_room(&mut entries, now);
        }

        entries.insert(
            key.to_string(),
            MemoryCacheEntry {
                value,
                absolute_expiry,
                sliding_ttl: options.sliding_ttl,
                last_access: now,
                priority: options.priority,
            },
        );

        Ok(())
    }

    /// Removes an entry, returning whether a live one was present
    pub fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        Ok(entries
            .remove(key)
            .is_some_and(|entry| !entry.is_expired(now)))
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.lock()?.is_empty())
    }

    /// Drops every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> Result<usize, DomainError> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));

        Ok(before - entries.len())
    }

    /// Number of live entries evicted for capacity since creation
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    fn make_room(&self, entries: &mut HashMap<String, MemoryCacheEntry<V>>, now: Instant) {
        entries.retain(|_, entry| !entry.is_expired(now));

        while entries.len() >= self.config.max_capacity {
            let victim = entries
                .iter()
                .min_by_key(|(_, entry)| (entry.priority, entry.last_access))
                .map(|(key, _)| key.clone());

            let Some(victim) = victim else {
                break;
            };

            entries.remove(&victim);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(key = %victim, "Evicted cache entry for capacity");
        }
    }
}

impl<V: Clone + Send + 'static> MemoryCache<V> {
    /// Spawns a task that purges expired entries every `interval`
    ///
    /// The task stops on its own once the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let Some(cache) = cache.upgrade() else {
                    break;
                };

                match cache.purge_expired() {
                    Ok(0) => {}
                    Ok(purged) => debug!(purged, "Swept expired cache entries"),
                    Err(e) => warn!(error = %e, "Cache sweep failed"),
                }
            }
        })
    }
}

impl<V: Clone> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
