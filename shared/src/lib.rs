//! Shared types for the Aura storefront
//!
//! Catalog records as stored remotely, the display shape consumed by the
//! storefront, the manifest envelope and the shopping cart.

pub mod cart;
pub mod models;
pub mod util;

// Re-exports
pub use cart::{Cart, CartItem};
pub use models::{CatalogEntry, CatalogManifest, DisplayProduct, Variant};
pub use serde::{Deserialize, Serialize};
