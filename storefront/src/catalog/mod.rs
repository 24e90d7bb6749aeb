//! Catalog - cached remote catalog and description backfill
//!
//! # Read path
//!
//! ```text
//! Storefront::load_products
//!   └─ CatalogCache::get_catalog
//!        ├─ fresh local cache  -> return
//!        ├─ remote manifest    -> hydrate, cache, return
//!        └─ remote failed      -> stale cache or []
//!   └─ empty?                  -> LocalInventory (bundled seed)
//! ```

pub mod backfill;
pub mod cache;

pub use backfill::{BackfillOutcome, DescriptionBackfill, RetryPolicy, needs_description};
pub use cache::{CatalogCache, FRESHNESS_WINDOW};

use shared::DisplayProduct;
use std::sync::Arc;

use crate::inventory::LocalInventory;

/// Products shown to shoppers
#[derive(Debug, Clone)]
pub struct Storefront {
    catalog: Arc<CatalogCache>,
    inventory: LocalInventory,
}

impl Storefront {
    pub fn new(catalog: Arc<CatalogCache>, inventory: LocalInventory) -> Self {
        Self { catalog, inventory }
    }

    pub fn catalog(&self) -> &Arc<CatalogCache> {
        &self.catalog
    }

    /// Remote catalog, or the local seed inventory when it is empty
    pub async fn load_products(&self) -> Vec<DisplayProduct> {
        let products = self.catalog.get_catalog().await;
        if !products.is_empty() {
            return products;
        }

        tracing::info!("Remote catalog empty, using local inventory");
        self.inventory.load()
    }
}
