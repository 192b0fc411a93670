use crate::domain::entities::{BackgroundSyncState, PendingCounts};
use std::sync::Arc;
use tokio::sync::watch;

/// Shared, observable in-memory mirror of the sync queue.
///
/// Cloning hands out another handle to the same state. Every mutation is
/// published to subscribers.
#[derive(Clone)]
pub struct SyncStateContainer {
    inner: Arc<watch::Sender<BackgroundSyncState>>,
}

impl SyncStateContainer {
    pub fn new(initial: BackgroundSyncState) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            inner: Arc::new(sender),
        }
    }

    pub fn snapshot(&self) -> BackgroundSyncState {
        self.inner.borrow().clone()
    }

    pub fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut BackgroundSyncState),
    {
        self.inner.send_modify(mutate);
    }

    pub fn apply_counts(&self, counts: &PendingCounts) {
        self.update(|state| {
            state.pending_orders = counts.orders;
            state.pending_inquiries = counts.inquiries;
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<BackgroundSyncState> {
        self.inner.subscribe()
    }
}

impl Default for SyncStateContainer {
    fn default() -> Self {
        Self::new(BackgroundSyncState::default())
    }
}
