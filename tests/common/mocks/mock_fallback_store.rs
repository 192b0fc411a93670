use async_trait::async_trait;
use miracle_sync::{AppError, FallbackStore};

/// Fallback store that rejects every read and write.
pub struct BrokenFallbackStore;

#[async_trait]
impl FallbackStore for BrokenFallbackStore {
    async fn get_item(&self, _key: &str) -> Result<Option<String>, AppError> {
        Err(AppError::Storage("quota exceeded".to_string()))
    }

    async fn set_item(&self, _key: &str, _value: &str) -> Result<(), AppError> {
        Err(AppError::Storage("quota exceeded".to_string()))
    }

    async fn update_item(
        &self,
        _key: &str,
        _update: &(dyn for<'a> Fn(Option<&'a str>) -> String + Send + Sync),
    ) -> Result<String, AppError> {
        Err(AppError::Storage("quota exceeded".to_string()))
    }
}
