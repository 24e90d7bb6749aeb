//! Remote document store holding the catalog manifest
//!
//! The catalog is one document at `documents/<collection>/<document>`.
//! Reads are get-by-path, writes overwrite the whole document.

use async_trait::async_trait;
use shared::CatalogManifest;

use crate::{ClientConfig, ClientResult, HttpClient};

/// Default collection of the catalog document
pub const DEFAULT_COLLECTION: &str = "system";
/// Default catalog document id
pub const DEFAULT_DOCUMENT: &str = "catalog_manifest";

/// Access to the remote catalog manifest
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the manifest; `Ok(None)` when the document does not exist yet
    async fn fetch_manifest(&self) -> ClientResult<Option<CatalogManifest>>;

    /// Overwrite the manifest (no merge)
    async fn write_manifest(&self, manifest: &CatalogManifest) -> ClientResult<()>;
}

/// HTTP implementation of [`DocumentStore`]
#[derive(Debug, Clone)]
pub struct DocumentStoreClient {
    http: HttpClient,
    path: String,
}

impl DocumentStoreClient {
    pub fn new(
        config: &ClientConfig,
        collection: impl AsRef<str>,
        document: impl AsRef<str>,
    ) -> ClientResult<Self> {
        Ok(Self {
            http: config.build_http_client()?,
            path: document_path(collection.as_ref(), document.as_ref()),
        })
    }

    /// Relative path of the catalog document
    pub fn document_path(&self) -> &str {
        &self.path
    }
}

fn document_path(collection: &str, document: &str) -> String {
    format!(
        "documents/{}/{}",
        collection.trim_matches('/'),
        document.trim_matches('/')
    )
}

#[async_trait]
impl DocumentStore for DocumentStoreClient {
    async fn fetch_manifest(&self) -> ClientResult<Option<CatalogManifest>> {
        tracing::debug!(path = %self.path, "Fetching catalog manifest");
        self.http.get_optional(&self.path).await
    }

    async fn write_manifest(&self, manifest: &CatalogManifest) -> ClientResult<()> {
        tracing::info!(
            path = %self.path,
            items = manifest.items.len(),
            "Overwriting catalog manifest"
        );
        self.http.put(&self.path, manifest).await
    }
}
