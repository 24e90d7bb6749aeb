//! Admin session - description generation and catalog publishing
//!
//! Generated descriptions are kept as a local draft until an operator
//! publishes them. Publishing overwrites the whole remote manifest, so it
//! always goes through an explicit confirmation.

use aura_client::{DocumentStore, GenerativeClient};
use shared::{CatalogManifest, DisplayProduct};
use std::sync::Arc;

use crate::catalog::{BackfillOutcome, CatalogCache, DescriptionBackfill};
use crate::store::KeyValueStore;
use crate::utils::{AppError, AppResult, Clock};

/// Local store key of the unsaved draft
pub const DRAFT_KEY: &str = "catalog_draft";
/// Local store key of the generative API key
pub const API_KEY_KEY: &str = "gemini_api_key";

/// Operator-facing catalog maintenance
#[derive(Clone)]
pub struct AdminSession {
    store: Arc<dyn KeyValueStore>,
    remote: Arc<dyn DocumentStore>,
    catalog: Arc<CatalogCache>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession").finish_non_exhaustive()
    }
}

impl AdminSession {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn DocumentStore>,
        catalog: Arc<CatalogCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            remote,
            catalog,
            clock,
        }
    }

    // ========== API key ==========

    pub fn save_api_key(&self, key: &str) -> AppResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::config("API key must not be empty"));
        }
        self.store.set(API_KEY_KEY, key)?;
        tracing::info!("Generative API key saved");
        Ok(())
    }

    pub fn api_key(&self) -> AppResult<Option<String>> {
        Ok(self.store.get(API_KEY_KEY)?.filter(|k| !k.is_empty()))
    }

    // ========== Draft ==========

    /// Unsaved draft; a corrupt draft is discarded
    pub fn load_draft(&self) -> AppResult<Option<Vec<DisplayProduct>>> {
        let Some(raw) = self.store.get(DRAFT_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                tracing::warn!("Discarding corrupt catalog draft: {}", e);
                self.store.remove(DRAFT_KEY)?;
                Ok(None)
            }
        }
    }

    pub fn has_unsaved_changes(&self) -> AppResult<bool> {
        Ok(self.load_draft()?.is_some())
    }

    pub fn save_draft(&self, products: &[DisplayProduct]) -> AppResult<()> {
        let payload = serde_json::to_string(products)?;
        self.store.set(DRAFT_KEY, &payload)?;
        Ok(())
    }

    pub fn discard_draft(&self) -> AppResult<()> {
        self.store.remove(DRAFT_KEY)?;
        Ok(())
    }

    /// Draft when present, otherwise the current catalog
    pub async fn working_copy(&self) -> AppResult<Vec<DisplayProduct>> {
        match self.load_draft()? {
            Some(draft) => Ok(draft),
            None => Ok(self.catalog.get_catalog().await),
        }
    }

    // ========== Operations ==========

    /// Fill missing descriptions in the working copy and keep the result as draft
    pub async fn generate_descriptions(
        &self,
        backfill: &DescriptionBackfill,
    ) -> AppResult<BackfillOutcome> {
        let products = self.working_copy().await?;
        let outcome = backfill.fill_missing_descriptions(products).await;

        if outcome.success_count > 0 {
            self.save_draft(&outcome.entries)?;
            tracing::info!(
                updated = outcome.success_count,
                "Descriptions generated, draft saved (not yet published)"
            );
        }

        Ok(outcome)
    }

    /// Overwrite the remote catalog with the draft
    ///
    /// `confirm` sees the manifest about to be written and decides whether to
    /// go ahead.
    pub async fn publish(
        &self,
        confirm: impl FnOnce(&CatalogManifest) -> bool,
    ) -> AppResult<CatalogManifest> {
        let draft = self.load_draft()?.ok_or(AppError::NoDraft)?;
        let manifest = CatalogManifest::from_products(draft, self.clock.now_millis());

        if !confirm(&manifest) {
            tracing::info!("Publish cancelled by operator");
            return Err(AppError::aborted("publish not confirmed"));
        }

        self.remote.write_manifest(&manifest).await?;
        tracing::info!(items = manifest.items.len(), "Catalog published");

        self.discard_draft()?;
        if let Err(e) = self.catalog.invalidate() {
            tracing::warn!("Failed to invalidate catalog cache after publish: {}", e);
        }

        Ok(manifest)
    }

    /// Available model names; an error means the key or endpoint is unusable
    pub async fn check_connection(&self, client: &GenerativeClient) -> AppResult<Vec<String>> {
        let models = client.list_models().await?;
        tracing::info!(count = models.len(), model = client.model(), "Generative API reachable");
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::backfill::PLACEHOLDER_DESCRIPTION;
    use crate::catalog::cache::{CACHE_KEY, TIMESTAMP_KEY};
    use crate::store::LocalStore;
    use crate::utils::ManualClock;
    use async_trait::async_trait;
    use aura_client::{ClientError, ClientResult, DescriptionGenerator, GenerationError};
    use shared::CatalogEntry;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const T0: i64 = 1_700_000_000_000;

    #[derive(Default)]
    struct MemoryRemote {
        manifest: Mutex<Option<CatalogManifest>>,
        writes: AtomicUsize,
        reject_writes: bool,
    }

    #[async_trait]
    impl DocumentStore for MemoryRemote {
        async fn fetch_manifest(&self) -> ClientResult<Option<CatalogManifest>> {
            Ok(self.manifest.lock().unwrap().clone())
        }

        async fn write_manifest(&self, manifest: &CatalogManifest) -> ClientResult<()> {
            if self.reject_writes {
                return Err(ClientError::Forbidden("read-only".into()));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            *self.manifest.lock().unwrap() = Some(manifest.clone());
            Ok(())
        }
    }

    struct FixedGenerator;

    #[async_trait]
    impl DescriptionGenerator for FixedGenerator {
        async fn generate(&self, product: &DisplayProduct) -> Result<String, GenerationError> {
            Ok(format!("{} leaves skin soft and luminous.", product.name))
        }
    }

    struct Fixture {
        store: Arc<LocalStore>,
        remote: Arc<MemoryRemote>,
        admin: AdminSession,
    }

    fn fixture_with(remote: MemoryRemote) -> Fixture {
        let store = Arc::new(LocalStore::open_in_memory().unwrap());
        let remote = Arc::new(remote);
        let clock = Arc::new(ManualClock::new(T0));
        let catalog = Arc::new(CatalogCache::new(
            store.clone(),
            remote.clone(),
            clock.clone(),
        ));
        let admin = AdminSession::new(store.clone(), remote.clone(), catalog, clock);
        Fixture {
            store,
            remote,
            admin,
        }
    }

    fn fixture() -> Fixture {
        let remote = MemoryRemote::default();
        *remote.manifest.lock().unwrap() = Some(CatalogManifest {
            last_updated: T0 - 1000,
            version: "1.0.0".into(),
            items: vec![
                CatalogEntry {
                    id: "p-1".into(),
                    name: "Golden Serum".into(),
                    description: PLACEHOLDER_DESCRIPTION.into(),
                    ..Default::default()
                },
                CatalogEntry {
                    id: "p-2".into(),
                    name: "Night Cream".into(),
                    description: "Rich overnight cream with ceramides.".into(),
                    ..Default::default()
                },
            ],
        });
        fixture_with(remote)
    }

    #[test]
    fn test_api_key_roundtrip() {
        let f = fixture();

        assert_eq!(f.admin.api_key().unwrap(), None);
        assert!(matches!(
            f.admin.save_api_key("   "),
            Err(AppError::Config(_))
        ));

        f.admin.save_api_key("  AIza-test  ").unwrap();
        assert_eq!(f.admin.api_key().unwrap().as_deref(), Some("AIza-test"));
    }

    #[test]
    fn test_corrupt_draft_is_discarded() {
        let f = fixture();
        f.store.set(DRAFT_KEY, "not json").unwrap();

        assert_eq!(f.admin.load_draft().unwrap(), None);
        assert_eq!(f.store.get(DRAFT_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_generate_saves_draft_without_publishing() {
        let f = fixture();
        let backfill = DescriptionBackfill::new(Arc::new(FixedGenerator));

        let outcome = f.admin.generate_descriptions(&backfill).await.unwrap();

        assert_eq!(outcome.success_count, 1);
        assert!(f.admin.has_unsaved_changes().unwrap());
        let draft = f.admin.load_draft().unwrap().unwrap();
        assert_eq!(draft[0].description, "Golden Serum leaves skin soft and luminous.");
        assert_eq!(f.remote.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_publish_without_draft() {
        let f = fixture();

        let result = f.admin.publish(|_| true).await;

        assert!(matches!(result, Err(AppError::NoDraft)));
    }

    #[tokio::test]
    async fn test_declined_publish_changes_nothing() {
        let f = fixture();
        let backfill = DescriptionBackfill::new(Arc::new(FixedGenerator));
        f.admin.generate_descriptions(&backfill).await.unwrap();

        let result = f.admin.publish(|_| false).await;

        assert!(matches!(result, Err(AppError::Aborted(_))));
        assert_eq!(f.remote.writes.load(Ordering::SeqCst), 0);
        assert!(f.admin.has_unsaved_changes().unwrap());
    }

    #[tokio::test]
    async fn test_publish_writes_manifest_and_invalidates_cache() {
        let f = fixture();
        let backfill = DescriptionBackfill::new(Arc::new(FixedGenerator));
        f.admin.generate_descriptions(&backfill).await.unwrap();
        assert!(f.store.get(CACHE_KEY).unwrap().is_some());

        let mut seen_items = 0;
        let manifest = f
            .admin
            .publish(|m| {
                seen_items = m.items.len();
                true
            })
            .await
            .unwrap();

        assert_eq!(seen_items, 2);
        assert_eq!(manifest.last_updated, T0);
        assert_eq!(manifest.version, "1.0.0");

        let stored = f.remote.manifest.lock().unwrap().clone().unwrap();
        assert_eq!(stored, manifest);
        assert_eq!(
            stored.items[0].description,
            "Golden Serum leaves skin soft and luminous."
        );

        assert!(!f.admin.has_unsaved_changes().unwrap());
        assert_eq!(f.store.get(CACHE_KEY).unwrap(), None);
        assert_eq!(f.store.get(TIMESTAMP_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_publish_keeps_draft() {
        let f = fixture_with(MemoryRemote {
            reject_writes: true,
            ..Default::default()
        });
        f.admin
            .save_draft(&[DisplayProduct::hydrate(CatalogEntry {
                id: "p-1".into(),
                ..Default::default()
            })])
            .unwrap();

        let result = f.admin.publish(|_| true).await;

        assert!(matches!(result, Err(AppError::Client(ClientError::Forbidden(_)))));
        assert!(f.admin.has_unsaved_changes().unwrap());
    }
}
