//! Display Product Model
//!
//! The storefront never renders a [`CatalogEntry`] directly. Hydration maps
//! each raw entry into a [`DisplayProduct`] whose `subtitle`, `image` and
//! `benefits` are always present, so views need no null handling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::{CatalogEntry, Variant};

/// Shown when a record has no photo reference
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x800/0a0a08/f2b90d?text=AURA";

/// Used when a record carries no benefit list
pub const DEFAULT_BENEFITS: [&str; 3] = [
    "Premium quality",
    "Dermatologically tested",
    "Cruelty free",
];

/// Product in the shape the storefront renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayProduct {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub barcodes: Vec<String>,

    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub tax_rate: f64,

    #[serde(default)]
    pub current_inventory: i64,
    #[serde(default)]
    pub min_stock_level: i64,

    #[serde(default)]
    pub variants: Option<BTreeMap<String, Variant>>,

    pub subtitle: String,
    pub image: String,
    pub benefits: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_limited: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

/// Subtitle fallback chain: own subtitle, then category, then vendor name
pub fn default_subtitle(subtitle: Option<&str>, category: &str, provider: &str) -> String {
    [subtitle.unwrap_or_default(), category, provider]
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .unwrap_or(provider)
        .to_string()
}

/// Photo reference, or the placeholder when absent/blank
pub fn default_image(image: Option<&str>) -> String {
    match image {
        Some(url) if !url.trim().is_empty() => url.to_string(),
        _ => PLACEHOLDER_IMAGE.to_string(),
    }
}

/// Benefit list, or [`DEFAULT_BENEFITS`] when absent/empty
pub fn default_benefits(benefits: Option<Vec<String>>) -> Vec<String> {
    match benefits {
        Some(list) if !list.is_empty() => list,
        _ => DEFAULT_BENEFITS.iter().map(|b| b.to_string()).collect(),
    }
}

impl DisplayProduct {
    /// Hydrate a raw catalog entry. Total: never fails, never leaves
    /// `image` or `benefits` empty.
    pub fn hydrate(entry: CatalogEntry) -> Self {
        let subtitle =
            default_subtitle(entry.subtitle.as_deref(), &entry.category, &entry.provider);
        let image = default_image(entry.image.as_deref());
        let benefits = default_benefits(entry.benefits);

        Self {
            id: entry.id,
            product_id: entry.product_id,
            barcodes: entry.barcodes,
            name: entry.name,
            description: entry.description,
            provider: entry.provider,
            category: entry.category,
            price: entry.price,
            cost: entry.cost,
            tax_rate: entry.tax_rate,
            current_inventory: entry.current_inventory,
            min_stock_level: entry.min_stock_level,
            variants: entry.variants,
            subtitle,
            image,
            benefits,
            is_new: entry.is_new,
            is_limited: entry.is_limited,
            volume: entry.volume,
        }
    }
}

impl From<CatalogEntry> for DisplayProduct {
    fn from(entry: CatalogEntry) -> Self {
        Self::hydrate(entry)
    }
}

/// Back to the storage shape, keeping the hydrated display fields
impl From<DisplayProduct> for CatalogEntry {
    fn from(product: DisplayProduct) -> Self {
        Self {
            id: product.id,
            product_id: product.product_id,
            barcodes: product.barcodes,
            name: product.name,
            description: product.description,
            provider: product.provider,
            category: product.category,
            price: product.price,
            cost: product.cost,
            tax_rate: product.tax_rate,
            current_inventory: product.current_inventory,
            min_stock_level: product.min_stock_level,
            variants: product.variants,
            subtitle: Some(product.subtitle),
            image: Some(product.image),
            benefits: Some(product.benefits),
            is_new: product.is_new,
            is_limited: product.is_limited,
            volume: product.volume,
        }
    }
}
