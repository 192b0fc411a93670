mod common;

use std::sync::Arc;

use common::mocks::{BrokenFallbackStore, UnavailableRecordStore};
use common::sync_support::{
    drain, sample_inquiry, sample_order, sample_preferences, setup_with_store, setup_with_stores,
    wait_for_state,
};
use miracle_sync::application::services::{PENDING_INQUIRIES_KEY, PENDING_ORDERS_KEY};
use miracle_sync::shared::config::DatabaseConfig;
use miracle_sync::{
    FallbackStore, InboundMessage, JsonFileFallbackStore, MemoryFallbackStore, PendingCounts,
    SqliteSyncRecordStore, SyncPhase,
};

#[tokio::test]
async fn test_add_order_counts_in_fallback_when_store_unavailable() {
    let store = Arc::new(UnavailableRecordStore::new());
    let mut ctx = setup_with_store(store.clone()).await;

    for expected in 1..=3u64 {
        assert!(ctx.service.add_order_to_sync(sample_order()).await);
        let stored = ctx.fallback.get_item(PENDING_ORDERS_KEY).await.unwrap();
        assert_eq!(stored, Some(expected.to_string()));
    }
    assert_eq!(store.add_attempts(), 3);

    let state = ctx.service.state();
    assert_eq!(state.pending_orders, 3);
    assert_eq!(state.sync_status.orders, SyncPhase::Syncing);

    // the worker is still told about the work, without a record id
    let messages = drain(&mut ctx.endpoint);
    assert_eq!(messages.len(), 3);
    assert!(messages
        .iter()
        .all(|message| message.payload().unwrap().get("syncId").is_none()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_each_increment_file_counter() {
    let dir = tempfile::tempdir().unwrap();
    let file_store = Arc::new(JsonFileFallbackStore::new(dir.path().join("counters.json")));
    let mut ctx = setup_with_stores(
        Arc::new(UnavailableRecordStore::new()),
        file_store.clone(),
        MemoryFallbackStore::new(),
    )
    .await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = ctx.service.clone();
        handles.push(tokio::spawn(async move {
            service.add_order_to_sync(sample_order()).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }

    assert_eq!(ctx.service.state().pending_orders, 10);
    assert_eq!(
        file_store
            .get_item(PENDING_ORDERS_KEY)
            .await
            .unwrap()
            .as_deref(),
        Some("10")
    );
    assert_eq!(drain(&mut ctx.endpoint).len(), 10);
}

#[tokio::test]
async fn test_load_pending_counts_reads_fallback_keys() {
    let fallback = MemoryFallbackStore::new();
    fallback.set_item(PENDING_ORDERS_KEY, "2").await.unwrap();
    fallback.set_item(PENDING_INQUIRIES_KEY, "5").await.unwrap();

    let ctx = setup_with_stores(
        Arc::new(UnavailableRecordStore::new()),
        Arc::new(fallback.clone()),
        fallback,
    )
    .await;

    let counts = ctx.service.load_pending_counts().await;
    assert_eq!(
        counts,
        PendingCounts {
            orders: 2,
            inquiries: 5,
            preferences: 0
        }
    );
    assert_eq!(ctx.service.state().total_pending(), 7);
}

#[tokio::test]
async fn test_store_open_failure_still_yields_counts() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        url: format!(
            "sqlite:{}",
            dir.path().join("absent").join("queue.db").display()
        ),
        max_connections: 1,
        connection_timeout: 2,
    };
    let store = Arc::new(SqliteSyncRecordStore::connect_lazy(&config).unwrap());

    let ctx = setup_with_store(store).await;

    let counts = ctx.service.load_pending_counts().await;
    assert_eq!(counts, PendingCounts::default());
    assert!(ctx.service.add_inquiry_to_sync(sample_inquiry("still works")).await);
    assert_eq!(
        ctx.fallback
            .get_item(PENDING_INQUIRIES_KEY)
            .await
            .unwrap()
            .as_deref(),
        Some("1")
    );
}

#[tokio::test]
async fn test_complete_resets_fallback_counter() {
    let ctx = setup_with_store(Arc::new(UnavailableRecordStore::new())).await;
    assert!(ctx.service.add_order_to_sync(sample_order()).await);
    assert!(ctx.service.add_order_to_sync(sample_order()).await);
    assert_eq!(ctx.service.state().pending_orders, 2);

    ctx.endpoint
        .report(InboundMessage::new("ORDERS_SYNC_COMPLETE", None));

    let state = wait_for_state(&ctx.service, |state| {
        state.sync_status.orders == SyncPhase::Success
    })
    .await;
    assert_eq!(state.pending_orders, 0);
    assert_eq!(
        ctx.fallback.get_item(PENDING_ORDERS_KEY).await.unwrap().as_deref(),
        Some("0")
    );
}

#[tokio::test]
async fn test_preferences_have_no_fallback_path() {
    let mut ctx = setup_with_store(Arc::new(UnavailableRecordStore::new())).await;

    assert!(!ctx.service.sync_user_preferences(sample_preferences()).await);
    assert!(drain(&mut ctx.endpoint).is_empty());
    assert_eq!(ctx.service.state().sync_status.preferences, SyncPhase::Idle);
}

#[tokio::test]
async fn test_double_failure_returns_false_and_keeps_counts() {
    let ctx = setup_with_stores(
        Arc::new(UnavailableRecordStore::new()),
        Arc::new(BrokenFallbackStore),
        MemoryFallbackStore::new(),
    )
    .await;

    assert!(!ctx.service.add_order_to_sync(sample_order()).await);

    let counts = ctx.service.load_pending_counts().await;
    assert_eq!(counts, PendingCounts::default());
    assert_eq!(ctx.service.state().pending_orders, 0);
}

#[tokio::test]
async fn test_unsupported_platform_rejects_work() {
    use miracle_sync::shared::config::SyncConfig;
    use miracle_sync::{BackgroundSyncService, SyncStateContainer, WorkerChannel};

    let store = common::sync_support::memory_record_store().await;
    let fallback = MemoryFallbackStore::new();
    let service = BackgroundSyncService::new(
        store.clone(),
        Arc::new(WorkerChannel::unsupported()),
        Arc::new(fallback.clone()),
        SyncStateContainer::default(),
        &SyncConfig::default(),
    );
    let state = service.initialize().await;
    assert!(!state.is_supported);

    assert!(!service.add_order_to_sync(sample_order()).await);
    assert!(!service.add_inquiry_to_sync(sample_inquiry("x")).await);
    assert!(!service.request_sync().await);
    assert!(!service.state().is_syncing);
    assert_eq!(service.load_pending_counts().await, PendingCounts::default());
    assert_eq!(fallback.get_item(PENDING_ORDERS_KEY).await.unwrap(), None);
}
