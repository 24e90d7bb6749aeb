//! Unified Error Handling
//!
//! Errors surfaced by admin operations and the CLI. Catalog reads never
//! return errors: remote and storage failures there are logged and degraded.

use aura_client::ClientError;

use crate::store::StorageError;

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation aborted: {0}")]
    Aborted(String),

    #[error("No unsaved catalog changes to publish")]
    NoDraft,
}

impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn aborted(msg: impl Into<String>) -> Self {
        Self::Aborted(msg.into())
    }
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;
