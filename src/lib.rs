pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::ports::{DeliveryChannel, DeliveryError, FallbackStore, SyncRecordStore};
pub use application::services::{
    BackgroundSyncService, CompletionReconciler, ReconcilerSubscription, SyncStateContainer,
};
pub use domain::entities::{
    BackgroundSyncState, InboundMessage, InquiryContact, InquiryData, NotificationSettings,
    OrderCustomer, OrderData, OutboundMessage, PendingCounts, SyncRecord, Theme, UserPreferences,
};
pub use domain::value_objects::{SyncPhase, SyncRecordId, SyncRecordStatus, SyncRecordType};
pub use infrastructure::delivery::{WorkerChannel, WorkerEndpoint};
pub use infrastructure::fallback::{JsonFileFallbackStore, MemoryFallbackStore};
pub use infrastructure::offline::SqliteSyncRecordStore;
pub use shared::{AppConfig, AppError, SyncOutcomeMetrics, SyncOutcomeSnapshot};
pub use state::AppState;

/// Installs the global tracing subscriber. Later calls are no-ops.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "miracle_sync=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
