//! Storage entity trait

use std::fmt::Debug;

use serde::{Serialize, de::DeserializeOwned};

/// Trait for types that can be stored, keyed by a string
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// Returns the entity's key
    fn key(&self) -> &str;
}
