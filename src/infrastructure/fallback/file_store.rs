use crate::application::ports::FallbackStore;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;

/// Fallback key/value storage kept as a single JSON object on disk.
///
/// The whole file is rewritten on every write; it only ever holds a
/// couple of counters.
pub struct JsonFileFallbackStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileFallbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, AppError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt fallback file");
                Ok(BTreeMap::new())
            }
        }
    }

    async fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let raw = serde_json::to_string_pretty(items)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl FallbackStore for JsonFileFallbackStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        let _guard = self.lock.lock().await;
        let items = self.load().await?;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load().await?;
        items.insert(key.to_string(), value.to_string());
        self.persist(&items).await
    }

    async fn update_item(
        &self,
        key: &str,
        update: &(dyn for<'a> Fn(Option<&'a str>) -> String + Send + Sync),
    ) -> Result<String, AppError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load().await?;
        let next = update(items.get(key).map(String::as_str));
        items.insert(key.to_string(), next.clone());
        self.persist(&items).await?;
        Ok(next)
    }
}
