use crate::application::ports::FallbackStore;
use crate::domain::entities::PendingCounts;
use crate::domain::value_objects::SyncRecordType;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::warn;

pub const PENDING_ORDERS_KEY: &str = "pending-orders-count";
pub const PENDING_INQUIRIES_KEY: &str = "pending-inquiries-count";

/// Lossy per-type counters kept in the flat fallback store.
///
/// Only orders and inquiries have a key. Preferences always read as 0 here.
#[derive(Clone)]
pub struct FallbackCounter {
    store: Arc<dyn FallbackStore>,
}

impl FallbackCounter {
    pub fn new(store: Arc<dyn FallbackStore>) -> Self {
        Self { store }
    }

    pub fn key_for(kind: SyncRecordType) -> Option<&'static str> {
        match kind {
            SyncRecordType::Order => Some(PENDING_ORDERS_KEY),
            SyncRecordType::Inquiry => Some(PENDING_INQUIRIES_KEY),
            SyncRecordType::Preferences => None,
        }
    }

    pub async fn read(&self, kind: SyncRecordType) -> Result<u64, AppError> {
        let Some(key) = Self::key_for(kind) else {
            return Ok(0);
        };
        let raw = self.store.get_item(key).await?;
        Ok(raw.as_deref().map_or(0, |value| parse_count(key, value)))
    }

    /// Adds one to the stored value and returns the new count. Concurrent
    /// callers each land exactly one increment.
    pub async fn increment(&self, kind: SyncRecordType) -> Result<u64, AppError> {
        let Some(key) = Self::key_for(kind) else {
            return Err(AppError::Storage(format!("No fallback counter for {kind}")));
        };
        let stored = self
            .store
            .update_item(key, &|current: Option<&str>| {
                let count = current.map_or(0, |value| parse_count(key, value));
                (count + 1).to_string()
            })
            .await?;
        Ok(parse_count(key, &stored))
    }

    pub async fn reset(&self, kind: SyncRecordType) -> Result<(), AppError> {
        match Self::key_for(kind) {
            Some(key) => self.store.set_item(key, "0").await,
            None => Ok(()),
        }
    }

    pub async fn counts(&self) -> Result<PendingCounts, AppError> {
        Ok(PendingCounts {
            orders: self.read(SyncRecordType::Order).await?,
            inquiries: self.read(SyncRecordType::Inquiry).await?,
            preferences: 0,
        })
    }
}

fn parse_count(key: &str, value: &str) -> u64 {
    value.trim().parse::<u64>().unwrap_or_else(|_| {
        warn!(key, value, "Unreadable fallback counter, treating as 0");
        0
    })
}
