//! Parking spot catalog service
//!
//! Owns the spot and price tier collections: cached bulk reads, CRUD with
//! invalidate-on-write, and the size/pricing lookups the vehicle flow
//! depends on.

use crate::cache_aside::{get_cached, invalidate, store_in_cache};
use crate::snapshot;
use async_trait::async_trait;
use parkflow_cache::keys::{SPOTS_KEY, TIERS_KEY};
use parkflow_core::{
    models::{AuditEntry, LogLevel, ParkingSpot, PriceTier, SizeClass},
    traits::{AuditSink, CacheService, CatalogService, SpotRepository, TierRepository},
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Catalog service over the cached spot and tier collections
pub struct CatalogServiceImpl<S, P, C>
where
    S: SpotRepository,
    P: TierRepository,
    C: CacheService,
{
    spot_repo: Arc<S>,
    tier_repo: Arc<P>,
    cache: Arc<C>,
    audit: Arc<dyn AuditSink>,
}

impl<S, P, C> CatalogServiceImpl<S, P, C>
where
    S: SpotRepository,
    P: TierRepository,
    C: CacheService,
{
    /// Create a new catalog service
    pub fn new(
        spot_repo: Arc<S>,
        tier_repo: Arc<P>,
        cache: Arc<C>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            spot_repo,
            tier_repo,
            cache,
            audit,
        }
    }

    /// Cache-aside load of the active spot collection.
    ///
    /// Cache hits are re-filtered; a stale or mispopulated blob must not
    /// leak deleted rows to callers.
    async fn load_spots(&self) -> AppResult<Vec<ParkingSpot>> {
        if let Some(spots) = get_cached::<ParkingSpot, _>(self.cache.as_ref(), SPOTS_KEY).await? {
            return Ok(spots
                .into_iter()
                .filter(|s| s.lifecycle.is_current())
                .collect());
        }

        debug!("Spot cache MISS, loading from repository");
        let spots = self.spot_repo.find_active().await?;
        store_in_cache(self.cache.as_ref(), SPOTS_KEY, &spots).await?;

        Ok(spots)
    }

    /// Cache-aside load of the active price tier collection
    async fn load_tiers(&self) -> AppResult<Vec<PriceTier>> {
        if let Some(tiers) = get_cached::<PriceTier, _>(self.cache.as_ref(), TIERS_KEY).await? {
            return Ok(tiers
                .into_iter()
                .filter(|t| t.lifecycle.is_current())
                .collect());
        }

        debug!("Tier cache MISS, loading from repository");
        let tiers = self.tier_repo.find_active().await?;
        store_in_cache(self.cache.as_ref(), TIERS_KEY, &tiers).await?;

        Ok(tiers)
    }

    /// Append an informational log row; a failed append never surfaces
    async fn log_info(&self, short_message: &str, full_message: &str) {
        if let Err(e) = self
            .audit
            .append_log(LogLevel::Information, short_message, full_message)
            .await
        {
            warn!("Failed to append log entry: {}", e);
        }
    }

    async fn record_audit(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.record_change(&entry).await {
            warn!("Failed to record audit entry: {}", e);
        }
    }

    /// List the active parking spots
    #[instrument(skip(self))]
    pub async fn list_spots(&self) -> AppResult<Vec<ParkingSpot>> {
        let spots = self.load_spots().await?;

        if spots.is_empty() {
            return Err(AppError::NotFound("parking spots".to_string()));
        }

        self.log_info(
            "catalog | list_spots",
            &format!("Listed {} parking spots", spots.len()),
        )
        .await;

        Ok(spots)
    }

    /// List the active price tiers
    #[instrument(skip(self))]
    pub async fn list_price_tiers(&self) -> AppResult<Vec<PriceTier>> {
        let tiers = self.load_tiers().await?;

        if tiers.is_empty() {
            return Err(AppError::NotFound("price tiers".to_string()));
        }

        self.log_info(
            "catalog | list_price_tiers",
            &format!("Listed {} price tiers", tiers.len()),
        )
        .await;

        Ok(tiers)
    }

    /// Resolve one active spot by id
    #[instrument(skip(self))]
    pub async fn get_spot_by_id(&self, id: i64) -> AppResult<ParkingSpot> {
        let spots = self.load_spots().await?;

        let spot = spots
            .into_iter()
            .find(|s| s.lifecycle.id == id)
            .ok_or_else(|| AppError::SpotNotFound(id.to_string()))?;

        self.log_info(
            "catalog | get_spot_by_id",
            &format!("Resolved parking spot {}", id),
        )
        .await;

        Ok(spot)
    }

    /// Create a parking spot; names are unique among non-deleted spots
    #[instrument(skip(self, spot))]
    pub async fn create_spot(&self, spot: ParkingSpot) -> AppResult<ParkingSpot> {
        if self.spot_repo.find_by_name(&spot.name).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "parking spot '{}'",
                spot.name
            )));
        }

        let created = self.spot_repo.create(&spot).await?;

        self.record_audit(AuditEntry::added(
            ParkingSpot::ENTITY_NAME,
            created.lifecycle.id,
            snapshot(&created),
        ))
        .await;
        invalidate(self.cache.as_ref(), SPOTS_KEY).await;

        Ok(created)
    }

    /// Update a parking spot
    #[instrument(skip(self, spot))]
    pub async fn update_spot(&self, spot: ParkingSpot) -> AppResult<ParkingSpot> {
        let updated = self.spot_repo.update(&spot).await?;

        self.record_audit(AuditEntry::modified(
            ParkingSpot::ENTITY_NAME,
            updated.lifecycle.id,
            None,
            snapshot(&updated),
        ))
        .await;
        invalidate(self.cache.as_ref(), SPOTS_KEY).await;

        Ok(updated)
    }

    /// Soft-delete a parking spot
    #[instrument(skip(self))]
    pub async fn delete_spot(&self, id: i64) -> AppResult<()> {
        let deleted = self.spot_repo.delete(id).await?;
        if !deleted {
            return Err(AppError::SpotNotFound(id.to_string()));
        }

        self.record_audit(AuditEntry::deleted(ParkingSpot::ENTITY_NAME, id))
            .await;
        invalidate(self.cache.as_ref(), SPOTS_KEY).await;

        Ok(())
    }

    /// Create a price tier for a spot
    #[instrument(skip(self, tier))]
    pub async fn create_price_tier(&self, tier: PriceTier) -> AppResult<PriceTier> {
        let created = self.tier_repo.create(&tier).await?;

        self.record_audit(AuditEntry::added(
            PriceTier::ENTITY_NAME,
            created.lifecycle.id,
            snapshot(&created),
        ))
        .await;
        invalidate(self.cache.as_ref(), TIERS_KEY).await;

        Ok(created)
    }

    /// Update a price tier
    #[instrument(skip(self, tier))]
    pub async fn update_price_tier(&self, tier: PriceTier) -> AppResult<PriceTier> {
        let updated = self.tier_repo.update(&tier).await?;

        self.record_audit(AuditEntry::modified(
            PriceTier::ENTITY_NAME,
            updated.lifecycle.id,
            None,
            snapshot(&updated),
        ))
        .await;
        invalidate(self.cache.as_ref(), TIERS_KEY).await;

        Ok(updated)
    }

    /// Soft-delete a price tier
    #[instrument(skip(self))]
    pub async fn delete_price_tier(&self, id: i64) -> AppResult<()> {
        let deleted = self.tier_repo.delete(id).await?;
        if !deleted {
            return Err(AppError::TierNotFound(id.to_string()));
        }

        self.record_audit(AuditEntry::deleted(PriceTier::ENTITY_NAME, id))
            .await;
        invalidate(self.cache.as_ref(), TIERS_KEY).await;

        Ok(())
    }
}

#[async_trait]
impl<S, P, C> CatalogService for CatalogServiceImpl<S, P, C>
where
    S: SpotRepository,
    P: TierRepository,
    C: CacheService,
{
    #[instrument(skip(self))]
    async fn get_spot_by_size(&self, size: SizeClass) -> AppResult<ParkingSpot> {
        let spots = self.load_spots().await?;

        spots
            .into_iter()
            .find(|s| s.size == size)
            .ok_or_else(|| AppError::SpotNotFound(format!("no active spot for size {}", size)))
    }

    #[instrument(skip(self))]
    async fn get_price_tier(
        &self,
        spot_id: i64,
        elapsed_hours: i64,
    ) -> AppResult<PriceTier> {
        let tiers = self.load_tiers().await?;

        // Tiers may overlap; the first match in insertion order wins.
        tiers
            .into_iter()
            .find(|t| t.spot_id == spot_id && t.covers(elapsed_hours))
            .ok_or_else(|| {
                AppError::TierNotFound(format!("spot {}, {} hours", spot_id, elapsed_hours))
            })
    }
}
