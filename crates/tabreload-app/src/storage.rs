//! Storage area backed by a JSON object file

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tabreload_core::{HostResult, StorageArea, TabReloadError};

/// Default location: `<data dir>/tabreload/storage.json`.
pub fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabreload")
        .join("storage.json")
}

/// Flat key-value storage persisted as one JSON object.
///
/// A missing file reads as empty. Anything other than a JSON object is a
/// storage error.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "storage.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_all(&self) -> HostResult<Map<String, Value>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&contents)? {
            Value::Object(items) => Ok(items),
            _ => Err(TabReloadError::storage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }
}

#[async_trait]
impl StorageArea for JsonFileStorage {
    async fn get(&self, keys: &[&str]) -> HostResult<Map<String, Value>> {
        let mut items = self.read_all().await?;
        items.retain(|key, _| keys.contains(&key.as_str()));
        Ok(items)
    }

    async fn set(&self, items: Map<String, Value>) -> HostResult<()> {
        // An unreadable file must not block writes; it is replaced.
        let mut stored = match self.read_all().await {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!(
                    "Discarding unreadable storage {}: {}",
                    self.path.display(),
                    e
                );
                Map::new()
            }
        };
        stored.extend(items);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_string_pretty(&Value::Object(stored))?;

        // Write a sibling file and rename it over the old one, so a crash
        // mid-write never leaves a truncated record behind.
        let staging = self.staging_path();
        tokio::fs::write(&staging, data).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        log::debug!("Wrote storage to {}", self.path.display());
        Ok(())
    }
}
