//! Catalog Cache - time-boxed local copy of the remote catalog manifest
//!
//! # Read path
//!
//! 1. Cached payload + timestamp younger than the freshness window → return
//!    the payload, no remote read.
//! 2. Otherwise read the manifest document:
//!    - missing → empty list (catalog not synced yet)
//!    - present → hydrate, persist payload + timestamp, return
//!    - failed → stale payload if any, else empty
//!
//! Failures never reach the caller; the worst case is a stale or empty list.

use aura_client::DocumentStore;
use shared::DisplayProduct;
use std::sync::Arc;
use std::time::Duration;

use crate::store::{KeyValueStore, StorageResult};
use crate::utils::Clock;

/// Key of the JSON-encoded product list
pub const CACHE_KEY: &str = "catalog_cache";
/// Key of the epoch-ms write time of [`CACHE_KEY`]
pub const TIMESTAMP_KEY: &str = "catalog_timestamp";
/// How long a cached catalog is trusted without a remote read
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Decoded cache slot
struct CachedCatalog {
    products: Vec<DisplayProduct>,
    /// `None` when the timestamp is missing or unreadable
    written_at: Option<i64>,
}

impl CachedCatalog {
    fn is_fresh(&self, now: i64, window: Duration) -> bool {
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        self.written_at
            .is_some_and(|written_at| now.saturating_sub(written_at) < window_ms)
    }
}

/// Catalog cache manager
pub struct CatalogCache {
    store: Arc<dyn KeyValueStore>,
    remote: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    freshness: Duration,
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache")
            .field("freshness", &self.freshness)
            .finish_non_exhaustive()
    }
}

impl CatalogCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            remote,
            clock,
            freshness: FRESHNESS_WINDOW,
        }
    }

    /// Override the freshness window
    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    /// Catalog for display, from cache when fresh
    pub async fn get_catalog(&self) -> Vec<DisplayProduct> {
        let cached = self.read_cache();
        let now = self.clock.now_millis();

        if let Some(cache) = &cached
            && cache.is_fresh(now, self.freshness)
        {
            tracing::info!(items = cache.products.len(), "Loading catalog from cache (0 reads)");
            return cache.products.clone();
        }

        tracing::info!("Catalog cache expired or empty, fetching from remote");
        self.fetch_remote(cached.map(|c| c.products)).await
    }

    /// Drop the cache and force a remote read
    pub async fn refresh_catalog(&self) -> Vec<DisplayProduct> {
        if let Err(e) = self.invalidate() {
            tracing::warn!("Failed to clear catalog cache: {e}");
        }
        self.fetch_remote(None).await
    }

    /// Clear payload and timestamp together
    pub fn invalidate(&self) -> StorageResult<()> {
        self.store.remove_many(&[CACHE_KEY, TIMESTAMP_KEY])
    }

    /// Read the cache slot; corrupt payloads are discarded
    fn read_cache(&self) -> Option<CachedCatalog> {
        let payload = match self.store.get(CACHE_KEY) {
            Ok(payload) => payload?,
            Err(e) => {
                tracing::warn!("Failed to read catalog cache: {e}");
                return None;
            }
        };

        let products: Vec<DisplayProduct> = match serde_json::from_str(&payload) {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!("Corrupt catalog cache, discarding: {e}");
                if let Err(e) = self.invalidate() {
                    tracing::warn!("Failed to clear corrupt catalog cache: {e}");
                }
                return None;
            }
        };

        let written_at = match self.store.get(TIMESTAMP_KEY) {
            Ok(Some(raw)) => raw.trim().parse::<i64>().ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read catalog timestamp: {e}");
                None
            }
        };

        Some(CachedCatalog {
            products,
            written_at,
        })
    }

    async fn fetch_remote(&self, stale: Option<Vec<DisplayProduct>>) -> Vec<DisplayProduct> {
        match self.remote.fetch_manifest().await {
            Ok(Some(manifest)) => {
                let products = manifest.into_products();
                if let Err(e) = self.write_cache(&products) {
                    tracing::warn!("Failed to persist catalog cache: {e}");
                }
                tracing::info!(items = products.len(), "Catalog fetched from remote (1 read)");
                products
            }
            Ok(None) => {
                tracing::warn!("No catalog manifest found; catalog has not been synced yet");
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Error fetching catalog: {e}");
                match stale {
                    Some(products) => {
                        tracing::warn!(items = products.len(), "Serving stale catalog cache");
                        products
                    }
                    None => Vec::new(),
                }
            }
        }
    }

    fn write_cache(&self, products: &[DisplayProduct]) -> Result<(), CacheWriteError> {
        let payload = serde_json::to_string(products)?;
        let timestamp = self.clock.now_millis().to_string();
        self.store
            .set_many(&[(CACHE_KEY, payload.as_str()), (TIMESTAMP_KEY, timestamp.as_str())])?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
enum CacheWriteError {
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] crate::store::StorageError),
}
