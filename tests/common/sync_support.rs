use std::sync::Arc;
use std::time::Duration;

use miracle_sync::shared::config::SyncConfig;
use miracle_sync::{
    BackgroundSyncService, BackgroundSyncState, DeliveryChannel, FallbackStore, InquiryContact,
    InquiryData, MemoryFallbackStore, NotificationSettings, OrderCustomer, OrderData,
    OutboundMessage, ReconcilerSubscription, SqliteSyncRecordStore, SyncRecordStore,
    SyncStateContainer, Theme, UserPreferences, WorkerChannel, WorkerEndpoint,
};
use sqlx::sqlite::SqlitePoolOptions;

pub struct SyncTestContext {
    pub service: Arc<BackgroundSyncService>,
    pub endpoint: WorkerEndpoint,
    pub fallback: MemoryFallbackStore,
    pub subscription: ReconcilerSubscription,
}

pub async fn memory_record_store() -> Arc<SqliteSyncRecordStore> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    Arc::new(SqliteSyncRecordStore::new(pool))
}

/// Service over an in-memory SQLite store with an active worker endpoint.
pub async fn setup_sync_service() -> (SyncTestContext, Arc<SqliteSyncRecordStore>) {
    let store = memory_record_store().await;
    let context = setup_with_store(store.clone()).await;
    (context, store)
}

pub async fn setup_with_store(store: Arc<dyn SyncRecordStore>) -> SyncTestContext {
    let fallback = MemoryFallbackStore::new();
    setup_with_stores(store, Arc::new(fallback.clone()), fallback).await
}

pub async fn setup_with_stores(
    store: Arc<dyn SyncRecordStore>,
    fallback_store: Arc<dyn FallbackStore>,
    fallback: MemoryFallbackStore,
) -> SyncTestContext {
    let (channel, endpoint) = WorkerChannel::new(16);
    endpoint.activate();
    let channel: Arc<dyn DeliveryChannel> = Arc::new(channel);

    let service = Arc::new(BackgroundSyncService::new(
        store,
        Arc::clone(&channel),
        fallback_store,
        SyncStateContainer::default(),
        &SyncConfig::default(),
    ));
    let subscription = service.reconciler().listen(channel.subscribe());
    service.initialize().await;

    SyncTestContext {
        service,
        endpoint,
        fallback,
        subscription,
    }
}

pub fn drain(endpoint: &mut WorkerEndpoint) -> Vec<OutboundMessage> {
    let mut messages = Vec::new();
    while let Some(message) = endpoint.try_recv() {
        messages.push(message);
    }
    messages
}

/// Waits until the service state satisfies `predicate` and returns it.
pub async fn wait_for_state<F>(service: &BackgroundSyncService, predicate: F) -> BackgroundSyncState
where
    F: FnMut(&BackgroundSyncState) -> bool,
{
    let mut rx = service.subscribe_state();
    tokio::time::timeout(Duration::from_secs(5), async move {
        let state = rx.wait_for(predicate).await.map(|state| state.clone());
        state
    })
    .await
    .expect("state change timed out")
    .expect("state channel closed")
}

pub fn sample_order() -> OrderData {
    OrderData {
        product_id: "bouquet-rose-12".to_string(),
        quantity: 1,
        customer_info: OrderCustomer {
            name: "Hana".to_string(),
            phone: "090-0000-0000".to_string(),
            address: "1-2-3 Shibuya".to_string(),
        },
        price: 5500.0,
    }
}

pub fn sample_inquiry(message: &str) -> InquiryData {
    InquiryData {
        product_id: "wedding-arrangement".to_string(),
        message: message.to_string(),
        customer_info: InquiryContact {
            name: "Ren".to_string(),
            phone: "080-1111-2222".to_string(),
            email: Some("ren@example.com".to_string()),
        },
    }
}

pub fn sample_preferences() -> UserPreferences {
    UserPreferences {
        favorite_categories: vec!["roses".to_string(), "orchids".to_string()],
        notification_settings: NotificationSettings {
            push: true,
            email: false,
        },
        theme: Theme::Dark,
    }
}
