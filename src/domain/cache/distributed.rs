//! Distributed cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::CacheEntryOptions;
use crate::domain::DomainError;

/// Shared key-value store holding serialized payloads
///
/// The store is payload-agnostic; callers serialize before `set_raw` and
/// deserialize after `get_raw` (see [`DistributedCacheExt`]). Presence is
/// reported through the `Option`, so a stored empty string is a hit.
#[async_trait]
pub trait DistributedCache: Send + Sync + Debug {
    /// Short backend name used in logs and errors
    fn backend_name(&self) -> &'static str;

    /// Gets a raw payload, renewing its sliding window on a hit
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores a raw payload, replacing any previous value
    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        options: &CacheEntryOptions,
    ) -> Result<(), DomainError>;

    /// Renews the sliding window without reading the payload
    async fn refresh(&self, key: &str) -> Result<bool, DomainError>;

    /// Removes a payload
    async fn remove(&self, key: &str) -> Result<bool, DomainError>;
}

/// Extension trait providing typed get/set through JSON
pub trait DistributedCacheExt: DistributedCache {
    /// Gets and decodes a value; a payload that fails to decode is an error
    fn get<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<Option<V>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get_raw(key).await? {
                Some(data) => {
                    let value: V = serde_json::from_str(&data).map_err(|e| {
                        DomainError::serialization(format!(
                            "Failed to deserialize cache value for key '{}': {}",
                            key, e
                        ))
                    })?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        }
    }

    /// Encodes and stores a value
    fn set<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
        options: &'a CacheEntryOptions,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let data = serde_json::to_string(value).map_err(|e| {
                DomainError::serialization(format!(
                    "Failed to serialize cache value for key '{}': {}",
                    key, e
                ))
            })?;
            self.set_raw(key, &data, options).await
        }
    }
}

impl<T: DistributedCache + ?Sized> DistributedCacheExt for T {}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock distributed cache for testing: no expiry, optional forced failure
    #[derive(Debug, Default)]
    pub struct MockDistributedCache {
        entries: Mutex<HashMap<String, String>>,
        error: Mutex<Option<String>>,
        gets: Mutex<usize>,
        sets: Mutex<usize>,
    }

    impl MockDistributedCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_raw_entry(self, key: &str, raw: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), raw.to_string());
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        pub fn get_count(&self) -> usize {
            *self.gets.lock().unwrap()
        }

        pub fn set_count(&self) -> usize {
            *self.sets.lock().unwrap()
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::cache_unavailable("mock", error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DistributedCache for MockDistributedCache {
        fn backend_name(&self) -> &'static str {
            "mock"
        }

        async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
            *self.gets.lock().unwrap() += 1;
            self.check_error()?;
            Ok(self.raw(key))
        }

        async fn set_raw(
            &self,
            key: &str,
            value: &str,
            _options: &CacheEntryOptions,
        ) -> Result<(), DomainError> {
            *self.sets.lock().unwrap() += 1;
            self.check_error()?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn refresh(&self, key: &str) -> Result<bool, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().contains_key(key))
        }

        async fn remove(&self, key: &str) -> Result<bool, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().remove(key).is_some())
        }
    }

    #[cfg(test)]
    mod tests {
        use std::time::Duration;

        use super::*;

        fn options() -> CacheEntryOptions {
            CacheEntryOptions::new(Duration::from_secs(60))
        }

        #[tokio::test]
        async fn test_mock_cache_set_get() {
            let cache = MockDistributedCache::new();
            cache.set("key1", &"value1", &options()).await.unwrap();

            let result: Option<String> = cache.get("key1").await.unwrap();
            assert_eq!(result, Some("value1".to_string()));
            assert_eq!(cache.raw("key1"), Some("\"value1\"".to_string()));
        }

        #[tokio::test]
        async fn test_mock_cache_get_missing() {
            let cache = MockDistributedCache::new();

            let result: Option<String> = cache.get("missing").await.unwrap();
            assert!(result.is_none());
        }

        #[tokio::test]
        async fn test_corrupt_payload_is_serialization_error() {
            let cache = MockDistributedCache::new().with_raw_entry("key1", "{not json");

            let result: Result<Option<Vec<i32>>, _> = cache.get("key1").await;
            assert!(matches!(result, Err(DomainError::Serialization { .. })));
        }

        #[tokio::test]
        async fn test_empty_payload_is_present_but_undecodable() {
            let cache = MockDistributedCache::new().with_raw_entry("key1", "");

            assert_eq!(cache.get_raw("key1").await.unwrap(), Some(String::new()));

            let result: Result<Option<String>, _> = cache.get("key1").await;
            assert!(matches!(result, Err(DomainError::Serialization { .. })));
        }

        #[tokio::test]
        async fn test_mock_cache_with_error() {
            let cache = MockDistributedCache::new().with_error("Connection refused");

            let result: Result<Option<String>, _> = cache.get("key").await;
            assert!(matches!(result, Err(DomainError::CacheUnavailable { .. })));
        }

        #[tokio::test]
        async fn test_mock_cache_remove() {
            let cache = MockDistributedCache::new().with_raw_entry("key1", "1");

            assert!(cache.remove("key1").await.unwrap());
            assert!(!cache.refresh("key1").await.unwrap());
        }
    }
}
