use super::completion_reconciler::CompletionReconciler;
use super::fallback_counter::FallbackCounter;
use super::pending_count_aggregator::PendingCountAggregator;
use super::sync_state::SyncStateContainer;
use crate::application::ports::{DeliveryChannel, DeliveryError, FallbackStore, SyncRecordStore};
use crate::domain::entities::{
    BackgroundSyncState, InquiryData, OrderData, OutboundMessage, PendingCounts, SyncPayload,
    SyncStatusBoard, UserPreferences,
};
use crate::domain::value_objects::{SyncData, SyncPhase, SyncRecordStatus, SyncRecordType};
use crate::shared::config::SyncConfig;
use crate::shared::metrics::{SyncOutcomeMetrics, SyncOutcomeSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Entry point used by the UI layer to enqueue work and ask for delivery.
///
/// Every public operation absorbs storage failures: callers get a `bool` or
/// a well-formed count, never an error.
pub struct BackgroundSyncService {
    store: Arc<dyn SyncRecordStore>,
    channel: Arc<dyn DeliveryChannel>,
    fallback: FallbackCounter,
    counts: PendingCountAggregator,
    state: SyncStateContainer,
    metrics: Arc<SyncOutcomeMetrics>,
    max_retries: u32,
    online: AtomicBool,
}

impl BackgroundSyncService {
    pub fn new(
        store: Arc<dyn SyncRecordStore>,
        channel: Arc<dyn DeliveryChannel>,
        fallback_store: Arc<dyn FallbackStore>,
        state: SyncStateContainer,
        config: &SyncConfig,
    ) -> Self {
        let fallback = FallbackCounter::new(fallback_store);
        let counts = PendingCountAggregator::new(Arc::clone(&store), fallback.clone());
        state.update(|current| current.is_supported = channel.is_supported());

        Self {
            store,
            channel,
            fallback,
            counts,
            state,
            metrics: Arc::new(SyncOutcomeMetrics::new()),
            max_retries: config.max_retries,
            online: AtomicBool::new(true),
        }
    }

    /// A reconciler sharing this service's store, state and metrics.
    pub fn reconciler(&self) -> CompletionReconciler {
        CompletionReconciler::new(
            Arc::clone(&self.store),
            self.fallback.clone(),
            self.counts.clone(),
            self.state.clone(),
            Arc::clone(&self.metrics),
        )
    }

    /// Opens the store and loads the initial counts. Store failures only
    /// switch counting to the fallback path.
    pub async fn initialize(&self) -> BackgroundSyncState {
        let supported = self.channel.is_supported();
        self.state.update(|state| state.is_supported = supported);
        if !supported {
            warn!("Background sync is not supported; queue runs in count-only mode");
        }

        match self.store.open().await {
            Ok(()) => {}
            Err(err) if err.is_storage_unavailable() => {
                warn!(error = %err, "Durable storage unavailable, falling back to counters");
            }
            Err(err) => error!(error = %err, "Failed to open sync store"),
        }

        self.load_pending_counts().await;
        self.state.snapshot()
    }

    pub async fn add_order_to_sync(&self, order: OrderData) -> bool {
        self.enqueue(SyncPayload::Order(order)).await
    }

    pub async fn add_inquiry_to_sync(&self, inquiry: InquiryData) -> bool {
        self.enqueue(SyncPayload::Inquiry(inquiry)).await
    }

    pub async fn sync_user_preferences(&self, preferences: UserPreferences) -> bool {
        self.enqueue(SyncPayload::Preferences(preferences)).await
    }

    /// Asks the delivery channel to attempt everything pending. Returns
    /// whether the request was handed over, not whether delivery succeeded.
    pub async fn request_sync(&self) -> bool {
        if !self.channel.is_supported() {
            warn!("Sync requested but background sync is not supported");
            return false;
        }

        self.state.update(|state| state.is_syncing = true);

        if self.requeue_failed().await > 0 {
            self.load_pending_counts().await;
        }

        match self.dispatch(OutboundMessage::RequestSync).await {
            Ok(()) => {
                info!("Sync requested");
                true
            }
            Err(err) => {
                error!(error = %err, "Failed to request sync");
                self.state.update(|state| state.is_syncing = false);
                false
            }
        }
    }

    /// Puts every per-type phase back to idle. Pending counts are untouched.
    pub fn reset_sync_status(&self) {
        self.state
            .update(|state| state.sync_status = SyncStatusBoard::default());
    }

    pub async fn load_pending_counts(&self) -> PendingCounts {
        self.counts.refresh(&self.state).await
    }

    /// Deletes delivered records. Returns how many were removed.
    pub async fn clear_successful(&self) -> u64 {
        match self.store.clear_successful().await {
            Ok(removed) => {
                if removed > 0 {
                    debug!(removed, "Cleared delivered sync records");
                }
                removed
            }
            Err(err) => {
                warn!(error = %err, "Failed to clear delivered sync records");
                0
            }
        }
    }

    /// Feeds the current network state. Coming back online requests a sync;
    /// returns whether one was requested.
    pub async fn on_connectivity_change(&self, online: bool) -> bool {
        let was_online = self.online.swap(online, Ordering::SeqCst);
        if online && !was_online {
            info!("Connectivity restored, requesting sync");
            return self.request_sync().await;
        }
        if !online && was_online {
            info!("Connectivity lost, queueing locally");
        }
        false
    }

    /// Periodically sweeps delivered records until the handle is aborted.
    pub fn spawn_cleanup(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                service.clear_successful().await;
            }
        })
    }

    pub fn state(&self) -> BackgroundSyncState {
        self.state.snapshot()
    }

    pub fn state_container(&self) -> SyncStateContainer {
        self.state.clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<BackgroundSyncState> {
        self.state.subscribe()
    }

    pub fn metrics(&self) -> SyncOutcomeSnapshot {
        self.metrics.snapshot()
    }

    async fn enqueue(&self, payload: SyncPayload) -> bool {
        let kind = payload.kind();
        if !self.channel.is_supported() {
            warn!(kind = %kind, "Background sync is not supported, not queueing");
            return false;
        }

        let data = match payload.to_sync_data() {
            Ok(data) => data,
            Err(err) => {
                error!(kind = %kind, error = %err, "Failed to serialize sync payload");
                return false;
            }
        };

        match self.store.add(kind, data.clone()).await {
            Ok(id) => {
                debug!(id = %id, kind = %kind, "Queued sync record");
                self.mark_queued(kind);
                self.notify(OutboundMessage::store(kind, &data, Some(&id)))
                    .await;
                true
            }
            Err(err) => {
                warn!(kind = %kind, error = %err, "Failed to persist sync record, using fallback counter");
                self.enqueue_fallback(kind, &data).await
            }
        }
    }

    async fn enqueue_fallback(&self, kind: SyncRecordType, data: &SyncData) -> bool {
        match self.fallback.increment(kind).await {
            Ok(count) => {
                debug!(kind = %kind, count, "Fallback counter incremented");
                self.mark_queued(kind);
                self.notify(OutboundMessage::store(kind, data, None)).await;
                true
            }
            Err(err) => {
                error!(kind = %kind, error = %err, "Fallback counter unavailable, dropping sync request");
                false
            }
        }
    }

    fn mark_queued(&self, kind: SyncRecordType) {
        self.state.update(|state| {
            if let Some(pending) = state.pending_mut(kind) {
                *pending += 1;
            }
            state.sync_status.set(kind, SyncPhase::Syncing);
        });
    }

    /// Failures are logged only; the record stays queued for the next request.
    async fn notify(&self, message: OutboundMessage) {
        let message_type = message.message_type();
        if let Err(err) = self.dispatch(message).await {
            warn!(message_type, error = %err, "Failed to notify delivery channel");
        }
    }

    async fn dispatch(&self, message: OutboundMessage) -> Result<(), DeliveryError> {
        self.channel.ready().await?;
        self.channel.post_message(message)
    }

    /// Moves failed records that still have attempts left back to pending.
    async fn requeue_failed(&self) -> usize {
        let failed = match self
            .store
            .get_by_status(SyncRecordStatus::Error, None)
            .await
        {
            Ok(records) => records,
            Err(err) => {
                debug!(error = %err, "Skipping retry re-enqueue, store unavailable");
                return 0;
            }
        };

        let mut requeued = 0;
        for record in failed
            .iter()
            .filter(|record| record.retry_count < self.max_retries)
        {
            match self
                .store
                .update_status(&record.id, SyncRecordStatus::Pending, None)
                .await
            {
                Ok(()) => requeued += 1,
                Err(err) => warn!(id = %record.id, error = %err, "Failed to re-enqueue sync record"),
            }
        }

        if requeued > 0 {
            info!(requeued, "Re-enqueued failed sync records");
        }
        requeued
    }
}
