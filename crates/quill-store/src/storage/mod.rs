//! Namespaced local key-value persistence
//!
//! A [`StorageDriver`] moves raw strings; [`Storage`] layers a key prefix
//! and JSON encoding on top so several applications (or several stores) can
//! share one driver without clobbering each other.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageResult;

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemDriver;
pub use memory::MemoryDriver;

/// Prefix used when none is configured
pub const DEFAULT_PREFIX: &str = "app";

/// Raw string storage backend
#[async_trait]
pub trait StorageDriver: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> StorageResult<()>;

    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Every stored key, across all prefixes
    async fn keys(&self) -> StorageResult<Vec<String>>;

    /// Remove everything, across all prefixes
    async fn clear(&self) -> StorageResult<()>;

    fn name(&self) -> &'static str;
}

/// JSON values under `{prefix}:{key}`
#[derive(Clone)]
pub struct Storage {
    driver: Arc<dyn StorageDriver>,
    prefix: String,
}

impl Storage {
    pub fn new(driver: Arc<dyn StorageDriver>, prefix: impl Into<String>) -> Self {
        Self {
            driver,
            prefix: prefix.into(),
        }
    }

    /// Storage over a fresh [`MemoryDriver`] with the default prefix
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryDriver::new()), DEFAULT_PREFIX)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn driver_name(&self) -> &'static str {
        self.driver.name()
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    fn strip<'a>(&self, full_key: &'a str) -> Option<&'a str> {
        full_key
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
    }

    /// Decoded value; a value that no longer decodes as `T` reads as absent
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let Some(raw) = self.driver.get(&self.full_key(key)).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::debug!("ignoring undecodable value at {}: {}", key, err);
                Ok(None)
            }
        }
    }

    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> StorageResult<T> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.driver.set(&self.full_key(key), raw).await
    }

    pub async fn remove(&self, key: &str) -> StorageResult<()> {
        self.driver.remove(&self.full_key(key)).await
    }

    pub async fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.driver.get(&self.full_key(key)).await?.is_some())
    }

    /// Keys under this prefix, with the prefix stripped
    pub async fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .driver
            .keys()
            .await?
            .iter()
            .filter_map(|key| self.strip(key).map(str::to_string))
            .collect();
        keys.sort();
        Ok(keys)
    }

    pub async fn len(&self) -> StorageResult<usize> {
        Ok(self.keys().await?.len())
    }

    pub async fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Remove only the keys under this prefix
    pub async fn clear(&self) -> StorageResult<()> {
        for key in self.keys().await? {
            self.remove(&key).await?;
        }
        Ok(())
    }

    /// Remove everything the driver holds
    pub async fn clear_all(&self) -> StorageResult<()> {
        self.driver.clear().await
    }
}
