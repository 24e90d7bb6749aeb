//! Local persistent key-value store
//!
//! String keys to string values, the way the storefront persists its catalog
//! cache, drafts and settings between runs.
//!
//! | Key | Value |
//! |-----|-------|
//! | `catalog_cache` | JSON list of display products |
//! | `catalog_timestamp` | epoch-ms of the last cache write |
//! | `catalog_draft` | unsaved admin edits (JSON list) |
//! | `gemini_api_key` | generative API key |
//! | `aura_local_inventory_v1` | seeded local inventory (JSON list) |

mod local;

pub use local::{LocalStore, StorageError, StorageResult};

/// String key-value storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Write several entries; implementations may do this atomically
    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Remove several keys; implementations may do this atomically
    fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}
