//! Cache-aside helpers shared by the services
//!
//! The cache never fails a read: errors degrade to a miss and the caller
//! falls through to the repository. Only non-empty collections are stored,
//! and writes invalidate by deleting the key, never by rewriting it.

use parkflow_cache::keys::DEFAULT_TTL_SECS;
use parkflow_core::{traits::CacheService, AppResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// Try to read a cached collection; a cache error degrades to a miss.
pub(crate) async fn get_cached<T, C>(cache: &C, key: &str) -> AppResult<Option<Vec<T>>>
where
    T: DeserializeOwned,
    C: CacheService,
{
    match cache.get::<Vec<T>>(key).await {
        Ok(found) => Ok(found),
        Err(e) => {
            warn!("Cache read failed for {}: {}", key, e);
            Ok(None)
        }
    }
}

/// Store a freshly loaded collection under its bulk key.
///
/// Empty collections are never cached, so absence of rows keeps reading
/// through to the store until data appears.
pub(crate) async fn store_in_cache<T, C>(cache: &C, key: &str, items: &[T]) -> AppResult<()>
where
    T: Serialize + Send + Sync,
    C: CacheService,
{
    if items.is_empty() {
        debug!("Skipping cache population for {}: empty collection", key);
        return Ok(());
    }

    if let Err(e) = cache.set(key, &items, DEFAULT_TTL_SECS).await {
        warn!("Failed to cache collection {}: {}", key, e);
    }

    Ok(())
}

/// Drop a bulk key after a write commits.
///
/// A failed delete is logged and swallowed; the TTL bounds how long the
/// stale copy can outlive it.
pub(crate) async fn invalidate<C>(cache: &C, key: &str)
where
    C: CacheService,
{
    if let Err(e) = cache.delete(key).await {
        warn!("Cache invalidation failed for {}: {}", key, e);
    }
}
