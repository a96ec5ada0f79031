// File: src/config.rs
// Purpose: Configuration parsing from quill.toml

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::{FilesystemDriver, MemoryDriver, Storage, StorageDriver, DEFAULT_PREFIX};

/// Default config file name
pub const CONFIG_FILE: &str = "quill.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Application metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_name")]
    pub name: String,
}

/// Which storage driver backs persisted state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    #[default]
    Memory,
    Filesystem,
}

/// Local persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Key namespace (default: "app")
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default)]
    pub driver: DriverKind,

    /// Directory for the filesystem driver
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
}

/// Route targets used by views and guards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigationConfig {
    #[serde(default = "default_home")]
    pub home: String,

    #[serde(default = "default_login")]
    pub login: String,

    #[serde(default = "default_admin")]
    pub admin: String,

    #[serde(default = "default_posts")]
    pub posts: String,

    /// Paths reachable without a session
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

/// UI helper tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,

    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: usize,
}

// Default values
fn default_name() -> String {
    "quill".to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".quill/storage")
}

fn default_home() -> String {
    "/".to_string()
}

fn default_login() -> String {
    "/auth/login".to_string()
}

fn default_admin() -> String {
    "/admin".to_string()
}

fn default_posts() -> String {
    "/admin/posts".to_string()
}

fn default_public_paths() -> Vec<String> {
    vec!["/".to_string(), "/login".to_string(), "/register".to_string()]
}

fn default_toast_duration_ms() -> u64 {
    3000
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_excerpt_length() -> usize {
    150
}

fn default_words_per_minute() -> usize {
    200
}

// Default implementations
impl Default for AppConfig {
    fn default() -> Self {
        Self { name: default_name() }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            driver: DriverKind::default(),
            dir: default_storage_dir(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            home: default_home(),
            login: default_login(),
            admin: default_admin(),
            posts: default_posts(),
            public_paths: default_public_paths(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: default_toast_duration_ms(),
            debounce_ms: default_debounce_ms(),
            excerpt_length: default_excerpt_length(),
            words_per_minute: default_words_per_minute(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load ./quill.toml, then apply environment overrides
    pub fn load_or_default() -> Result<Self> {
        let mut config = Self::load(CONFIG_FILE)?;
        config.apply_env();
        Ok(config)
    }

    /// Apply `QUILL_STORAGE_PREFIX` and `QUILL_STORAGE_DIR`
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(prefix) = lookup("QUILL_STORAGE_PREFIX").filter(|p| !p.is_empty()) {
            self.storage.prefix = prefix;
        }
        if let Some(dir) = lookup("QUILL_STORAGE_DIR").filter(|d| !d.is_empty()) {
            self.storage.dir = PathBuf::from(dir);
            self.storage.driver = DriverKind::Filesystem;
        }
    }

    /// Build the namespaced storage this config describes
    pub async fn open_storage(&self) -> Result<Storage> {
        let driver: Arc<dyn StorageDriver> = match self.storage.driver {
            DriverKind::Memory => Arc::new(MemoryDriver::new()),
            DriverKind::Filesystem => Arc::new(
                FilesystemDriver::new(&self.storage.dir)
                    .await
                    .with_context(|| format!("Failed to open storage dir: {:?}", self.storage.dir))?,
            ),
        };
        Ok(Storage::new(driver, self.storage.prefix.clone()))
    }
}
