//! Filesystem storage driver
//!
//! One file per key. File names are the percent-encoded key plus `.json`,
//! so `keys()` can recover the exact key from the directory listing.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::StorageDriver;
use crate::error::StorageResult;

const EXTENSION: &str = "json";

/// Filesystem storage driver
///
/// Persistent across restarts; suitable for a single local process.
#[derive(Debug, Clone)]
pub struct FilesystemDriver {
    dir: PathBuf,
}

impl FilesystemDriver {
    /// Open (and create if needed) the storage directory
    pub async fn new(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", urlencoding::encode(key), EXTENSION))
    }

    fn path_to_key(path: &Path) -> Option<String> {
        if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        urlencoding::decode(stem).ok().map(|key| key.into_owned())
    }

    async fn entries(&self) -> StorageResult<Vec<PathBuf>> {
        let mut paths = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                paths.push(entry.path());
            }
        }

        Ok(paths)
    }
}

#[async_trait]
impl StorageDriver for FilesystemDriver {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.key_to_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        fs::write(self.key_to_path(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.key_to_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self
            .entries()
            .await?
            .iter()
            .filter_map(|path| Self::path_to_key(path))
            .collect())
    }

    async fn clear(&self) -> StorageResult<()> {
        for path in self.entries().await? {
            if Self::path_to_key(&path).is_some() {
                fs::remove_file(&path).await?;
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_filesystem_driver_basic() {
        let temp_dir = TempDir::new().unwrap();
        let driver = FilesystemDriver::new(temp_dir.path()).await.unwrap();

        driver.set("app:auth.user", "{}".to_string()).await.unwrap();
        assert_eq!(driver.get("app:auth.user").await.unwrap().as_deref(), Some("{}"));
        assert_eq!(driver.keys().await.unwrap(), vec!["app:auth.user".to_string()]);

        driver.remove("app:auth.user").await.unwrap();
        assert_eq!(driver.get("app:auth.user").await.unwrap(), None);
        driver.remove("app:auth.user").await.unwrap();
    }

    #[tokio::test]
    async fn test_filesystem_driver_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let driver = FilesystemDriver::new(temp_dir.path()).await.unwrap();
            driver.set("blog/draft", "\"hi\"".to_string()).await.unwrap();
        }

        {
            let driver = FilesystemDriver::new(temp_dir.path()).await.unwrap();
            assert_eq!(driver.get("blog/draft").await.unwrap().as_deref(), Some("\"hi\""));
        }
    }

    #[tokio::test]
    async fn test_clear_ignores_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        let driver = FilesystemDriver::new(temp_dir.path()).await.unwrap();
        std::fs::write(temp_dir.path().join("README.txt"), "keep").unwrap();

        driver.set("a", "1".to_string()).await.unwrap();
        driver.clear().await.unwrap();

        assert!(driver.keys().await.unwrap().is_empty());
        assert!(temp_dir.path().join("README.txt").exists());
    }
}
