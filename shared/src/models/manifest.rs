//! Catalog Manifest
//!
//! The single remote document holding the whole catalog plus metadata.

use serde::{Deserialize, Serialize};

use super::catalog::CatalogEntry;
use super::product::DisplayProduct;
use super::serde_helpers::null_default;

/// Schema version written by publish
pub const MANIFEST_VERSION: &str = "1.0.0";

/// Remote catalog document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogManifest {
    /// Epoch milliseconds of the last publish
    #[serde(deserialize_with = "null_default")]
    pub last_updated: i64,
    #[serde(deserialize_with = "null_default")]
    pub version: String,
    #[serde(deserialize_with = "null_default")]
    pub items: Vec<CatalogEntry>,
}

impl CatalogManifest {
    /// Build a manifest for publishing from display products
    pub fn from_products(products: Vec<DisplayProduct>, last_updated: i64) -> Self {
        Self {
            last_updated,
            version: MANIFEST_VERSION.to_string(),
            items: products.into_iter().map(CatalogEntry::from).collect(),
        }
    }

    /// Hydrate every entry for display
    pub fn into_products(self) -> Vec<DisplayProduct> {
        self.items.into_iter().map(DisplayProduct::hydrate).collect()
    }
}
