//! Local inventory - bundled seed catalog persisted in the local store
//!
//! The first read seeds the store from `seed/products.json` (compiled into
//! the binary). Later reads return whatever is stored. A corrupt stored
//! payload is discarded and reseeded.

use shared::{CatalogEntry, DisplayProduct};
use std::sync::Arc;

use crate::store::KeyValueStore;

/// Local store key of the seeded inventory
pub const INVENTORY_KEY: &str = "aura_local_inventory_v1";

const SEED_JSON: &str = include_str!("../seed/products.json");

/// Bundled seed products, hydrated for display
pub fn seed_products() -> Vec<DisplayProduct> {
    match serde_json::from_str::<Vec<CatalogEntry>>(SEED_JSON) {
        Ok(entries) => entries.into_iter().map(DisplayProduct::hydrate).collect(),
        Err(e) => {
            tracing::error!("Bundled seed catalog is invalid: {}", e);
            Vec::new()
        }
    }
}

/// Seed-backed product list kept in the local store
#[derive(Clone)]
pub struct LocalInventory {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for LocalInventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalInventory").finish_non_exhaustive()
    }
}

impl LocalInventory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored inventory, seeding it first when absent or corrupt
    pub fn load(&self) -> Vec<DisplayProduct> {
        match self.store.get(INVENTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<DisplayProduct>>(&raw) {
                Ok(products) => {
                    tracing::debug!(count = products.len(), "Inventory loaded from local store");
                    return products;
                }
                Err(e) => tracing::warn!("Corrupt local inventory, resetting: {}", e),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read local inventory: {}", e),
        }

        tracing::info!("Initializing local inventory from seed");
        let products = seed_products();
        if let Err(e) = self.save(&products) {
            tracing::warn!("Failed to persist seeded inventory: {}", e);
        }
        products
    }

    /// Replace the stored inventory
    pub fn save(&self, products: &[DisplayProduct]) -> crate::utils::AppResult<()> {
        let payload = serde_json::to_string(products)?;
        self.store.set(INVENTORY_KEY, &payload)?;
        Ok(())
    }
}
