use super::fallback_counter::FallbackCounter;
use super::sync_state::SyncStateContainer;
use crate::application::ports::SyncRecordStore;
use crate::domain::entities::PendingCounts;
use crate::domain::value_objects::SyncRecordStatus;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Derives the pending counts shown in the UI, degrading to the fallback counter.
///
/// UI counts cover all undelivered work: `pending` records plus records
/// whose last attempt failed. The store's own `pending_counts` stays strict.
#[derive(Clone)]
pub struct PendingCountAggregator {
    store: Arc<dyn SyncRecordStore>,
    fallback: FallbackCounter,
}

impl PendingCountAggregator {
    pub fn new(store: Arc<dyn SyncRecordStore>, fallback: FallbackCounter) -> Self {
        Self { store, fallback }
    }

    /// Store counts, else fallback counts. Fails only if both sources fail.
    pub async fn load(&self) -> Result<PendingCounts, AppError> {
        match self.load_outstanding().await {
            Ok(counts) => Ok(counts),
            Err(err) => {
                warn!(error = %err, "Pending counts unavailable from store, reading fallback counters");
                self.fallback.counts().await
            }
        }
    }

    async fn load_outstanding(&self) -> Result<PendingCounts, AppError> {
        let pending = self.store.pending_counts().await?;
        let failed = self
            .store
            .get_by_status(SyncRecordStatus::Error, None)
            .await?;
        Ok(pending.combined(PendingCounts::by_type(&failed)))
    }

    /// Loads counts into `state`. On total failure the last known counts stay in place.
    pub async fn refresh(&self, state: &SyncStateContainer) -> PendingCounts {
        match self.load().await {
            Ok(counts) => {
                debug!(
                    orders = counts.orders,
                    inquiries = counts.inquiries,
                    preferences = counts.preferences,
                    "Pending counts refreshed"
                );
                state.apply_counts(&counts);
                counts
            }
            Err(err) => {
                error!(error = %err, "Failed to load pending counts from any source");
                let current = state.snapshot();
                PendingCounts {
                    orders: current.pending_orders,
                    inquiries: current.pending_inquiries,
                    preferences: 0,
                }
            }
        }
    }
}
