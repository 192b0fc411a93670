use async_trait::async_trait;
use miracle_sync::domain::value_objects::SyncData;
use miracle_sync::{
    AppError, PendingCounts, SyncRecord, SyncRecordId, SyncRecordStatus, SyncRecordStore,
    SyncRecordType,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Record store whose storage engine can never be reached.
#[derive(Default)]
pub struct UnavailableRecordStore {
    add_attempts: AtomicUsize,
}

impl UnavailableRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_attempts(&self) -> usize {
        self.add_attempts.load(Ordering::SeqCst)
    }

    fn unavailable() -> AppError {
        AppError::StorageUnavailable("storage disabled".to_string())
    }
}

#[async_trait]
impl SyncRecordStore for UnavailableRecordStore {
    async fn open(&self) -> Result<(), AppError> {
        Err(Self::unavailable())
    }

    async fn add(&self, _kind: SyncRecordType, _data: SyncData) -> Result<SyncRecordId, AppError> {
        self.add_attempts.fetch_add(1, Ordering::SeqCst);
        Err(Self::unavailable())
    }

    async fn get(&self, _id: &SyncRecordId) -> Result<Option<SyncRecord>, AppError> {
        Err(Self::unavailable())
    }

    async fn get_by_status(
        &self,
        _status: SyncRecordStatus,
        _kind: Option<SyncRecordType>,
    ) -> Result<Vec<SyncRecord>, AppError> {
        Err(Self::unavailable())
    }

    async fn update_status(
        &self,
        _id: &SyncRecordId,
        _status: SyncRecordStatus,
        _retry_count: Option<u32>,
    ) -> Result<(), AppError> {
        Err(Self::unavailable())
    }

    async fn advance_status(
        &self,
        _id: &SyncRecordId,
        _status: SyncRecordStatus,
        _retry_count: Option<u32>,
    ) -> Result<(), AppError> {
        Err(Self::unavailable())
    }

    async fn delete(&self, _id: &SyncRecordId) -> Result<(), AppError> {
        Err(Self::unavailable())
    }

    async fn pending_counts(&self) -> Result<PendingCounts, AppError> {
        Err(Self::unavailable())
    }

    async fn clear_successful(&self) -> Result<u64, AppError> {
        Err(Self::unavailable())
    }
}
