//! In-memory storage driver

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StorageDriver;
use crate::error::StorageResult;

/// In-memory storage driver
///
/// Fast but non-persistent - entries are lost when the last clone drops.
#[derive(Clone, Default)]
pub struct MemoryDriver {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of raw entries across all prefixes
    pub async fn size(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl StorageDriver for MemoryDriver {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }

    async fn clear(&self) -> StorageResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_driver_basic() {
        let driver = MemoryDriver::new();

        driver.set("k", "v".to_string()).await.unwrap();
        assert_eq!(driver.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(driver.size().await, 1);

        driver.remove("k").await.unwrap();
        assert_eq!(driver.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_driver_clear() {
        let driver = MemoryDriver::new();
        driver.set("a", "1".to_string()).await.unwrap();
        driver.set("b", "2".to_string()).await.unwrap();

        driver.clear().await.unwrap();
        assert!(driver.keys().await.unwrap().is_empty());
    }
}
