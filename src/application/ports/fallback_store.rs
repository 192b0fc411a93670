use crate::shared::error::AppError;
use async_trait::async_trait;

/// Flat string key/value storage used when the record store is unavailable.
#[async_trait]
pub trait FallbackStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Replaces the value of `key` with `update(current)` under a single lock
    /// acquisition and returns what was stored.
    async fn update_item(
        &self,
        key: &str,
        update: &(dyn for<'a> Fn(Option<&'a str>) -> String + Send + Sync),
    ) -> Result<String, AppError>;
}
