//! Catalog Entry Model
//!
//! Raw record shape kept in the remote catalog manifest. Inventory and
//! accounting fields live here; display fields are optional and filled in by
//! [`DisplayProduct`](super::DisplayProduct) hydration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::serde_helpers::null_default;

/// Product variant (shade, size, ...)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Variant {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Added to the base price
    #[serde(deserialize_with = "null_default")]
    pub price_modifier: f64,
    #[serde(deserialize_with = "null_default")]
    pub sku_suffix: String,
}

/// Catalog entry as stored in the remote document
///
/// Every field tolerates absence so partially synced records still decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogEntry {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// Human readable SKU (e.g. "GJ-500")
    #[serde(deserialize_with = "null_default")]
    pub product_id: String,
    #[serde(deserialize_with = "null_default")]
    pub barcodes: Vec<String>,

    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    /// Vendor name
    #[serde(deserialize_with = "null_default")]
    pub provider: String,
    #[serde(deserialize_with = "null_default")]
    pub category: String,

    #[serde(deserialize_with = "null_default")]
    pub price: f64,
    /// Acquisition cost, never shown in the storefront
    #[serde(deserialize_with = "null_default")]
    pub cost: f64,
    /// Fraction, e.g. 0.21
    #[serde(deserialize_with = "null_default")]
    pub tax_rate: f64,

    #[serde(deserialize_with = "null_default")]
    pub current_inventory: i64,
    /// Reorder point
    #[serde(deserialize_with = "null_default")]
    pub min_stock_level: i64,

    /// variant id -> variant
    pub variants: Option<BTreeMap<String, Variant>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Photo reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_limited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_entry_decodes_with_defaults() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"id":"p-1","name":"Gold Serum","price":49.5}"#).unwrap();

        assert_eq!(entry.id, "p-1");
        assert_eq!(entry.name, "Gold Serum");
        assert_eq!(entry.price, 49.5);
        assert!(entry.description.is_empty());
        assert!(entry.barcodes.is_empty());
        assert!(entry.variants.is_none());
        assert!(entry.image.is_none());
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let json = r#"{
            "id": "p-4",
            "name": "Silk Lip Tint",
            "description": null,
            "category": null,
            "barcodes": null,
            "price": null,
            "variants": { "v1": { "name": null, "priceModifier": 2.5, "skuSuffix": null } },
            "image": null
        }"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.name, "Silk Lip Tint");
        assert!(entry.description.is_empty());
        assert!(entry.category.is_empty());
        assert!(entry.barcodes.is_empty());
        assert_eq!(entry.price, 0.0);
        assert!(entry.image.is_none());
        let variant = &entry.variants.unwrap()["v1"];
        assert!(variant.name.is_empty());
        assert_eq!(variant.price_modifier, 2.5);
    }

    #[test]
    fn test_entry_uses_camel_case_wire_names() {
        let json = r#"{
            "id": "p-2",
            "productId": "GJ-500",
            "barcodes": ["8410000000001"],
            "provider": "Maison Lumiere",
            "taxRate": 0.21,
            "currentInventory": 12,
            "minStockLevel": 3,
            "variants": {
                "v1": { "name": "50ml", "priceModifier": 10, "skuSuffix": "-50" }
            },
            "isNew": true
        }"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.product_id, "GJ-500");
        assert_eq!(entry.tax_rate, 0.21);
        assert_eq!(entry.current_inventory, 12);
        assert_eq!(entry.min_stock_level, 3);
        assert_eq!(entry.is_new, Some(true));
        let variants = entry.variants.unwrap();
        assert_eq!(variants["v1"].sku_suffix, "-50");
        assert_eq!(variants["v1"].price_modifier, 10.0);
    }

    #[test]
    fn test_absent_optionals_are_not_serialized() {
        let entry = CatalogEntry {
            id: "p-3".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&entry).unwrap();

        assert!(value.get("image").is_none());
        assert!(value.get("benefits").is_none());
        assert!(value.get("subtitle").is_none());
        assert_eq!(value["productId"], "");
    }
}
