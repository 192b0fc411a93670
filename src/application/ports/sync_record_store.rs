use crate::domain::entities::{PendingCounts, SyncRecord};
use crate::domain::value_objects::{SyncData, SyncRecordId, SyncRecordStatus, SyncRecordType};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Durable table of sync records keyed by id, with lookups by type and status.
///
/// Every operation is a single atomic step against the storage engine;
/// records are independent so no multi-record transaction is offered.
#[async_trait]
pub trait SyncRecordStore: Send + Sync {
    /// Idempotent. Drops and recreates the table on a schema-version mismatch.
    /// Fails with `StorageUnavailable` when no durable storage is reachable.
    async fn open(&self) -> Result<(), AppError>;

    /// Persists a new `pending` record and returns its id.
    async fn add(&self, kind: SyncRecordType, data: SyncData) -> Result<SyncRecordId, AppError>;

    async fn get(&self, id: &SyncRecordId) -> Result<Option<SyncRecord>, AppError>;

    /// Order of the result is unspecified.
    async fn get_by_status(
        &self,
        status: SyncRecordStatus,
        kind: Option<SyncRecordType>,
    ) -> Result<Vec<SyncRecord>, AppError>;

    /// The only mutation path for an existing record. `NotFound` when absent,
    /// `InvalidTransition` when the state machine forbids the change.
    async fn update_status(
        &self,
        id: &SyncRecordId,
        status: SyncRecordStatus,
        retry_count: Option<u32>,
    ) -> Result<(), AppError>;

    /// Moves a record to `status` along the shortest legal path (through
    /// `syncing` when needed) inside one atomic step, so no intermediate
    /// state is ever persisted. Same `NotFound`/`InvalidTransition` rules
    /// as `update_status`.
    async fn advance_status(
        &self,
        id: &SyncRecordId,
        status: SyncRecordStatus,
        retry_count: Option<u32>,
    ) -> Result<(), AppError>;

    /// No-op when the record is already gone.
    async fn delete(&self, id: &SyncRecordId) -> Result<(), AppError>;

    async fn pending_counts(&self) -> Result<PendingCounts, AppError>;

    /// Deletes every `success` record; returns how many were removed.
    async fn clear_successful(&self) -> Result<u64, AppError>;
}
