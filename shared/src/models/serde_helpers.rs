//! Serde helpers for loosely written remote documents
//!
//! Container-level `#[serde(default)]` only covers absent fields; editors of
//! the remote catalog also write explicit `null`s.

use serde::{Deserialize, Deserializer};

/// Deserialize a value that treats null as `T::default()`
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
