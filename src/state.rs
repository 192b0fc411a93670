use crate::application::ports::{DeliveryChannel, FallbackStore, SyncRecordStore};
use crate::application::services::{
    BackgroundSyncService, ReconcilerSubscription, SyncStateContainer,
};
use crate::infrastructure::fallback::JsonFileFallbackStore;
use crate::infrastructure::offline::SqliteSyncRecordStore;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Composition root for the offline sync queue.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub sync_service: Arc<BackgroundSyncService>,
    pub record_store: Arc<SqliteSyncRecordStore>,
    subscription: Arc<Mutex<Option<ReconcilerSubscription>>>,
    cleanup_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl AppState {
    pub async fn new(config: AppConfig, channel: Arc<dyn DeliveryChannel>) -> Result<Self, AppError> {
        config.validate().map_err(AppError::ConfigurationError)?;

        if let Err(err) = tokio::fs::create_dir_all(&config.storage.data_dir).await {
            // the store reports StorageUnavailable on open and counting degrades
            warn!(data_dir = %config.storage.data_dir, error = %err, "Failed to create data directory");
        }

        let record_store = Arc::new(SqliteSyncRecordStore::connect_lazy(&config.database)?);
        let fallback_store: Arc<dyn FallbackStore> =
            Arc::new(JsonFileFallbackStore::new(config.fallback_path()));

        let sync_service = Arc::new(BackgroundSyncService::new(
            Arc::clone(&record_store) as Arc<dyn SyncRecordStore>,
            Arc::clone(&channel),
            fallback_store,
            SyncStateContainer::default(),
            &config.sync,
        ));

        // listen before the first count load so no report is missed
        let subscription = sync_service.reconciler().listen(channel.subscribe());
        let state = sync_service.initialize().await;

        let cleanup_task = sync_service
            .spawn_cleanup(Duration::from_secs(config.sync.cleanup_interval_secs));

        info!(
            supported = state.is_supported,
            pending_orders = state.pending_orders,
            pending_inquiries = state.pending_inquiries,
            "Offline sync queue ready"
        );

        Ok(Self {
            config,
            sync_service,
            record_store,
            subscription: Arc::new(Mutex::new(Some(subscription))),
            cleanup_task: Arc::new(Mutex::new(Some(cleanup_task))),
        })
    }

    /// Stops the message listener and housekeeping. Safe to call more than once.
    pub async fn shutdown(&self) {
        if let Some(subscription) = self.subscription.lock().await.take() {
            subscription.unsubscribe().await;
        }
        if let Some(task) = self.cleanup_task.lock().await.take() {
            task.abort();
            let _ = task.await;
        }
        self.record_store.pool().close().await;
        info!("Offline sync queue stopped");
    }
}
