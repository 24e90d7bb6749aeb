//! Aura Client - HTTP clients for the remote catalog and text generation
//!
//! Provides network-based calls to:
//! - the remote document store holding the catalog manifest
//! - the generative-text API used to write product descriptions

pub mod config;
pub mod document;
pub mod error;
pub mod generative;
pub mod http;

pub use config::ClientConfig;
pub use document::{DocumentStore, DocumentStoreClient};
pub use error::{ClientError, ClientResult, GenerationError, classify_error};
pub use generative::{DescriptionGenerator, GenerativeClient};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::{CatalogEntry, CatalogManifest, DisplayProduct};
