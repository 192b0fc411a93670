pub mod background_sync_service;
pub mod completion_reconciler;
pub mod fallback_counter;
pub mod pending_count_aggregator;
pub mod sync_state;

pub use background_sync_service::BackgroundSyncService;
pub use completion_reconciler::{CompletionReconciler, ReconcilerSubscription};
pub use fallback_counter::{FallbackCounter, PENDING_INQUIRIES_KEY, PENDING_ORDERS_KEY};
pub use pending_count_aggregator::PendingCountAggregator;
pub use sync_state::SyncStateContainer;
