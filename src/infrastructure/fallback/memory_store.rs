use crate::application::ports::FallbackStore;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local fallback storage. Values are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryFallbackStore {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryFallbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FallbackStore for MemoryFallbackStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn update_item(
        &self,
        key: &str,
        update: &(dyn for<'a> Fn(Option<&'a str>) -> String + Send + Sync),
    ) -> Result<String, AppError> {
        let mut items = self.items.write().await;
        let next = update(items.get(key).map(String::as_str));
        items.insert(key.to_string(), next.clone());
        Ok(next)
    }
}
