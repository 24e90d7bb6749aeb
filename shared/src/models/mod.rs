//! Data models
//!
//! Shared between the storefront, the admin tooling and the remote
//! document store (via JSON). Field names are camelCase on the wire.

pub mod catalog;
pub mod manifest;
pub mod product;
pub mod serde_helpers;

// Re-exports
pub use catalog::*;
pub use manifest::*;
pub use product::*;
