//! Asynchronous key-value medium
//!
//! The stores in `app-state` persist through this abstraction: a string-keyed,
//! string-valued medium with suspending `get`/`set`/`remove`. Each value is a
//! single serialized blob; there is no transactionality beyond single-key writes.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::kv::{KvError, KvStore};

/// Medium error types
#[derive(Debug, Error)]
pub enum MediumError {
    /// Underlying key-value store failed
    #[error("Key-value store error: {0}")]
    Kv(#[from] KvError),

    /// Stored value could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Medium is not reachable
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for medium operations
pub type Result<T> = std::result::Result<T, MediumError>;

/// Persistent key-value medium
#[async_trait]
pub trait KeyValueMedium: Send + Sync {
    /// Read the value stored under `key`, `None` when absent
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    async fn set_item(&self, key: &str, value: String) -> Result<()>;

    /// Remove the value under `key`, returning whether one existed
    async fn remove_item(&self, key: &str) -> Result<bool>;
}

#[async_trait]
impl KeyValueMedium for KvStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_raw(key)?)
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        Ok(self.set_raw(key, &value)?)
    }

    async fn remove_item(&self, key: &str) -> Result<bool> {
        Ok(self.remove(key)?)
    }
}

/// Process-local medium backed by a map
///
/// Nothing survives the process; useful for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryMedium {
    /// Create an empty medium
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a medium pre-populated with entries
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let items = items.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { items: RwLock::new(items) }
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the medium holds no entries
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Drop every entry, as an external storage clear would
    pub async fn clear(&self) {
        self.items.write().await.clear();
    }
}

#[async_trait]
impl KeyValueMedium for MemoryMedium {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.items.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<bool> {
        Ok(self.items.write().await.remove(key).is_some())
    }
}

/// Read and deserialize a JSON value stored under `key`
pub async fn load_json<T>(medium: &dyn KeyValueMedium, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    match medium.get_item(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` as JSON and overwrite `key` with it
pub async fn store_json<T>(medium: &dyn KeyValueMedium, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    medium.set_item(key, raw).await
}
