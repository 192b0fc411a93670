use super::fallback_counter::FallbackCounter;
use super::pending_count_aggregator::PendingCountAggregator;
use super::sync_state::SyncStateContainer;
use crate::application::ports::SyncRecordStore;
use crate::domain::entities::{InboundMessage, SyncRecord};
use crate::domain::value_objects::{SyncOutcome, SyncPhase, SyncRecordStatus, SyncRecordType};
use crate::shared::metrics::SyncOutcomeMetrics;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Converges stored records and in-memory state with outcomes reported by
/// the delivery channel. Never talks to the channel itself.
#[derive(Clone)]
pub struct CompletionReconciler {
    store: Arc<dyn SyncRecordStore>,
    fallback: FallbackCounter,
    counts: PendingCountAggregator,
    state: SyncStateContainer,
    metrics: Arc<SyncOutcomeMetrics>,
}

/// Live listener registration. Dropping it also stops the listener.
pub struct ReconcilerSubscription {
    handle: Option<JoinHandle<()>>,
}

impl CompletionReconciler {
    pub fn new(
        store: Arc<dyn SyncRecordStore>,
        fallback: FallbackCounter,
        counts: PendingCountAggregator,
        state: SyncStateContainer,
        metrics: Arc<SyncOutcomeMetrics>,
    ) -> Self {
        Self {
            store,
            fallback,
            counts,
            state,
            metrics,
        }
    }

    pub async fn handle_message(&self, message: &InboundMessage) {
        let Some((scope, outcome)) = message.event() else {
            debug!(message_type = %message.message_type, "Ignoring unknown sync message");
            return;
        };

        self.metrics
            .record(scope, matches!(outcome, SyncOutcome::Complete));

        match (scope.record_type(), outcome) {
            (Some(kind), SyncOutcome::Complete) => self.complete(kind, message).await,
            (Some(kind), SyncOutcome::Error) => self.fail(kind, message).await,
            (None, SyncOutcome::Complete) => {
                info!("General sync completed");
                self.state.update(|state| {
                    state.is_syncing = false;
                    state.last_sync_time = Some(Utc::now().timestamp_millis());
                });
                self.counts.refresh(&self.state).await;
            }
            (None, SyncOutcome::Error) => {
                error!(
                    detail = message.error_detail().as_deref().unwrap_or("unknown"),
                    "General sync failed"
                );
                self.state.update(|state| state.is_syncing = false);
            }
        }
    }

    /// Spawns a task applying every message from `receiver` until it closes
    /// or the returned subscription is torn down.
    pub fn listen(&self, mut receiver: broadcast::Receiver<InboundMessage>) -> ReconcilerSubscription {
        let reconciler = self.clone();
        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(message) => reconciler.handle_message(&message).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Sync message listener lagged, refreshing counts");
                        reconciler.counts.refresh(&reconciler.state).await;
                    }
                    Err(RecvError::Closed) => {
                        debug!("Delivery channel closed, stopping sync message listener");
                        break;
                    }
                }
            }
        });
        ReconcilerSubscription {
            handle: Some(handle),
        }
    }

    async fn complete(&self, kind: SyncRecordType, message: &InboundMessage) {
        let targets = self.targets(kind, message).await;
        for record in &targets {
            self.transition(record, SyncRecordStatus::Success, None).await;
        }

        if let Err(err) = self.fallback.reset(kind).await {
            warn!(kind = %kind, error = %err, "Failed to reset fallback counter");
        }

        info!(kind = %kind, records = targets.len(), "Sync completed");
        self.state.update(|state| {
            state.sync_status.set(kind, SyncPhase::Success);
            state.last_sync_time = Some(Utc::now().timestamp_millis());
        });
        self.counts.refresh(&self.state).await;
    }

    async fn fail(&self, kind: SyncRecordType, message: &InboundMessage) {
        let targets = self.targets(kind, message).await;
        error!(
            kind = %kind,
            records = targets.len(),
            detail = message.error_detail().as_deref().unwrap_or("unknown"),
            "Sync failed"
        );

        for record in &targets {
            let retry_count = message
                .retry_count()
                .unwrap_or_else(|| record.retry_count.saturating_add(1));
            self.transition(record, SyncRecordStatus::Error, Some(retry_count))
                .await;
        }

        // failed records stay in the pending counts until delivered
        self.state
            .update(|state| state.sync_status.set(kind, SyncPhase::Error));
    }

    /// Records named by the message, else every in-flight record of `kind`.
    /// A report that names records only ever touches those records.
    async fn targets(&self, kind: SyncRecordType, message: &InboundMessage) -> Vec<SyncRecord> {
        if let Some(ids) = message.sync_ids() {
            let mut records = Vec::with_capacity(ids.len());
            for id in ids {
                match self.store.get(&id).await {
                    Ok(Some(record)) if record.kind == kind => records.push(record),
                    Ok(Some(record)) => {
                        warn!(id = %id, expected = %kind, actual = %record.kind, "Sync report names a record of another type");
                    }
                    Ok(None) => warn!(id = %id, "Sync report names an unknown record"),
                    Err(err) => warn!(id = %id, error = %err, "Failed to load reported record"),
                }
            }
            if records.is_empty() {
                debug!(kind = %kind, "Sync report names no known records");
            }
            return records;
        }

        let mut records = Vec::new();
        for status in [SyncRecordStatus::Pending, SyncRecordStatus::Syncing] {
            match self.store.get_by_status(status, Some(kind)).await {
                Ok(found) => records.extend(found),
                Err(err) => {
                    warn!(kind = %kind, status = %status, error = %err, "Failed to look up in-flight records");
                }
            }
        }
        records
    }

    async fn transition(
        &self,
        record: &SyncRecord,
        target: SyncRecordStatus,
        retry_count: Option<u32>,
    ) {
        if record.status.is_terminal() {
            debug!(id = %record.id, "Sync record already delivered");
            return;
        }
        if record.status == target && retry_count.is_none() {
            return;
        }

        if let Err(err) = self
            .store
            .advance_status(&record.id, target, retry_count)
            .await
        {
            warn!(id = %record.id, from = %record.status, to = %target, error = %err, "Failed to update sync record");
        }
    }
}

impl ReconcilerSubscription {
    /// Stops the listener and waits for it to finish.
    pub async fn unsubscribe(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ReconcilerSubscription {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
