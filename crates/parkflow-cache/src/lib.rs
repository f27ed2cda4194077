//! Redis caching layer for Parkflow
//!
//! Provides the caching implementation used in front of bulk catalog and
//! vehicle reads. Implements the `CacheService` trait from parkflow-core:
//! whole collections are stored as JSON blobs under the keys in [`keys`],
//! writes invalidate by deleting the key, and reads repopulate on miss.
//!
//! # Features
//!
//! - Connection pooling via Redis ConnectionManager
//! - Automatic serialization/deserialization using serde_json
//! - TTL on every set; nothing lives in the cache forever
//! - Comprehensive error handling with conversion to AppError
//!
//! # Example
//!
//! ```no_run
//! use parkflow_cache::RedisCache;
//! use parkflow_core::traits::CacheService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = RedisCache::new("redis://127.0.0.1:6379").await?;
//!
//!     // Set a value with 60 second TTL
//!     cache.set("my_key", &"my_value", 60).await?;
//!
//!     // Get the value back
//!     let value: Option<String> = cache.get("my_key").await?;
//!     assert_eq!(value, Some("my_value".to_string()));
//!
//!     Ok(())
//! }
//! ```

pub mod keys;

use async_trait::async_trait;
use parkflow_core::error::AppError;
use parkflow_core::traits::CacheService;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

/// Redis cache implementation with connection pooling
///
/// Wraps a Redis ConnectionManager to provide efficient, multiplexed access
/// to Redis. All operations are async and return Results with AppError.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Create a new Redis cache instance
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://127.0.0.1:6379")
    ///
    /// # Errors
    ///
    /// Returns `AppError::CacheConnection` if the connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use parkflow_cache::RedisCache;
    /// # async fn example() -> Result<(), parkflow_core::error::AppError> {
    /// let cache = RedisCache::new("redis://localhost:6379").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(url: &str) -> Result<Self, AppError> {
        debug!("Connecting to Redis at {}", url);

        let client = Client::open(url).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            AppError::CacheConnection(format!("Invalid Redis URL: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to establish Redis connection: {}", e);
            AppError::CacheConnection(format!("Connection failed: {}", e))
        })?;

        debug!("Redis connection established successfully");
        Ok(Self { manager })
    }

    /// Ping the Redis server to check connectivity
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cache` if the ping fails
    pub async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Redis ping failed: {}", e);
                AppError::Cache(format!("Ping failed: {}", e))
            })?;
        Ok(())
    }

    /// Convert RedisError to AppError
    fn map_redis_error(err: RedisError) -> AppError {
        match err.kind() {
            redis::ErrorKind::IoError => {
                error!("Redis I/O error: {}", err);
                AppError::CacheConnection(format!("I/O error: {}", err))
            }
            redis::ErrorKind::TypeError => {
                warn!("Redis type error: {}", err);
                AppError::Cache(format!("Type mismatch: {}", err))
            }
            _ => {
                error!("Redis error: {}", err);
                AppError::Cache(err.to_string())
            }
        }
    }
}

#[async_trait]
impl CacheService for RedisCache {
    /// Get a value from cache and deserialize it
    ///
    /// # Type Parameters
    ///
    /// * `T` - The type to deserialize to, must implement `DeserializeOwned`
    ///
    /// # Arguments
    ///
    /// * `key` - The cache key to retrieve
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))` if the key exists and deserialization succeeds
    /// - `Ok(None)` if the key doesn't exist
    /// - `Err(AppError)` if Redis or deserialization fails
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        debug!("GET {}", key);
        let mut conn = self.manager.clone();

        let result: Option<String> = conn.get(key).await.map_err(Self::map_redis_error)?;

        match result {
            Some(json) => {
                let value = serde_json::from_str::<T>(&json).map_err(|e| {
                    error!("Failed to deserialize value for key {}: {}", key, e);
                    AppError::Serialization(format!("Deserialization failed: {}", e))
                })?;
                debug!("Cache HIT: {}", key);
                Ok(Some(value))
            }
            None => {
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
        }
    }

    /// Set a value in cache with TTL
    ///
    /// # Type Parameters
    ///
    /// * `T` - The type to serialize, must implement `Serialize + Send + Sync`
    ///
    /// # Arguments
    ///
    /// * `key` - The cache key to set
    /// * `value` - The value to cache
    /// * `ttl_secs` - Time-to-live in seconds
    ///
    /// # Errors
    ///
    /// Returns `AppError` if serialization or Redis operation fails
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), AppError> {
        debug!("SET {} (TTL: {}s)", key, ttl_secs);
        let mut conn = self.manager.clone();

        let json = serde_json::to_string(value).map_err(|e| {
            error!("Failed to serialize value for key {}: {}", key, e);
            AppError::Serialization(format!("Serialization failed: {}", e))
        })?;

        let _: () = conn
            .set_ex(key, json, ttl_secs)
            .await
            .map_err(Self::map_redis_error)?;

        Ok(())
    }

    /// Delete a key from cache
    ///
    /// Write paths call this to invalidate a bulk collection; the key is
    /// removed, never rewritten in place.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the key was deleted, `Ok(false)` if it didn't exist
    async fn delete(&self, key: &str) -> Result<bool, AppError> {
        debug!("DEL {}", key);
        let mut conn = self.manager.clone();

        let deleted: i32 = conn.del(key).await.map_err(Self::map_redis_error)?;

        Ok(deleted > 0)
    }

    /// Check if a key exists in cache
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the key exists, `Ok(false)` otherwise
    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        debug!("EXISTS {}", key);
        let mut conn = self.manager.clone();

        let exists: bool = conn.exists(key).await.map_err(Self::map_redis_error)?;

        Ok(exists)
    }

    /// Drop every key in the current database
    ///
    /// # Warning
    ///
    /// This operation is destructive and will delete all cached data.
    /// The store repopulates lazily on the next round of reads.
    async fn clear(&self) -> Result<(), AppError> {
        debug!("FLUSHDB");
        let mut conn = self.manager.clone();

        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Failed to flush database: {}", e);
                AppError::Cache(format!("Flush failed: {}", e))
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        id: i64,
        name: String,
    }

    async fn setup_cache() -> RedisCache {
        let cache = RedisCache::new("redis://127.0.0.1:6379")
            .await
            .expect("Failed to connect to Redis");
        cache.clear().await.expect("Failed to flush DB");
        cache
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_ping() {
        let cache = setup_cache().await;
        assert!(cache.ping().await.is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_set_and_get_collection() {
        let cache = setup_cache().await;

        let data = vec![
            TestData {
                id: 1,
                name: "A1".to_string(),
            },
            TestData {
                id: 2,
                name: "B2".to_string(),
            },
        ];

        // Set value
        cache.set(keys::SPOTS_KEY, &data, 60).await.unwrap();

        // Get value back
        let result: Option<Vec<TestData>> = cache.get(keys::SPOTS_KEY).await.unwrap();
        assert_eq!(result, Some(data));
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_get_nonexistent() {
        let cache = setup_cache().await;

        let result: Option<TestData> = cache.get("nonexistent").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_delete() {
        let cache = setup_cache().await;

        let data = TestData {
            id: 1,
            name: "Test".to_string(),
        };

        // Set and verify
        cache.set("test_key", &data, 60).await.unwrap();
        assert!(cache.exists("test_key").await.unwrap());

        // Delete and verify
        let deleted = cache.delete("test_key").await.unwrap();
        assert!(deleted);
        assert!(!cache.exists("test_key").await.unwrap());

        // Delete nonexistent
        let deleted = cache.delete("test_key").await.unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_clear_removes_all_keys() {
        let cache = setup_cache().await;

        cache.set("key_one", &1i64, 60).await.unwrap();
        cache.set("key_two", &2i64, 60).await.unwrap();

        cache.clear().await.unwrap();

        assert!(!cache.exists("key_one").await.unwrap());
        assert!(!cache.exists("key_two").await.unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_ttl_on_set() {
        let cache = setup_cache().await;

        let data = TestData {
            id: 1,
            name: "Test".to_string(),
        };

        // Set with 1 second TTL
        cache.set("test_key", &data, 1).await.unwrap();

        // Verify key exists
        assert!(cache.exists("test_key").await.unwrap());

        // Wait for expiration
        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;

        // Verify key is gone
        let result: Option<TestData> = cache.get("test_key").await.unwrap();
        assert_eq!(result, None);
    }
}
