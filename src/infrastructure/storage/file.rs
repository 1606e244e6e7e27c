//! JSON file settings store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::domain::tariff::SettingsStore;
use crate::shared::errors::{DomainResult, InfraError};

/// Keeps the tariff tree in one pretty-printed JSON file. Saves go to a
/// sibling temp file first and are renamed over the original.
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read(&self) -> Result<Value, InfraError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write(&self, tree: &Value) -> Result<(), InfraError> {
        let bytes = serde_json::to_vec_pretty(tree)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load(&self) -> DomainResult<Value> {
        let tree = self.read().await?;
        debug!(path = %self.path.display(), "Tariff tree read");
        Ok(tree)
    }

    async fn save(&self, tree: &Value) -> DomainResult<()> {
        self.write(tree).await?;
        info!(path = %self.path.display(), "Tariff tree written");
        Ok(())
    }
}
