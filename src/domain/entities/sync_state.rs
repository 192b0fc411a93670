use crate::domain::value_objects::{SyncPhase, SyncRecordType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatusBoard {
    pub orders: SyncPhase,
    pub inquiries: SyncPhase,
    pub preferences: SyncPhase,
}

impl SyncStatusBoard {
    pub fn get(&self, kind: SyncRecordType) -> SyncPhase {
        match kind {
            SyncRecordType::Order => self.orders,
            SyncRecordType::Inquiry => self.inquiries,
            SyncRecordType::Preferences => self.preferences,
        }
    }

    pub fn set(&mut self, kind: SyncRecordType, phase: SyncPhase) {
        match kind {
            SyncRecordType::Order => self.orders = phase,
            SyncRecordType::Inquiry => self.inquiries = phase,
            SyncRecordType::Preferences => self.preferences = phase,
        }
    }
}

/// What the UI layer renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundSyncState {
    pub is_supported: bool,
    pub pending_orders: u64,
    pub pending_inquiries: u64,
    pub is_syncing: bool,
    pub last_sync_time: Option<i64>,
    pub sync_status: SyncStatusBoard,
}

impl BackgroundSyncState {
    pub fn total_pending(&self) -> u64 {
        self.pending_orders + self.pending_inquiries
    }

    pub fn has_success(&self) -> bool {
        [
            self.sync_status.orders,
            self.sync_status.inquiries,
            self.sync_status.preferences,
        ]
        .contains(&SyncPhase::Success)
    }

    /// Pending counter shown for a record type. Preferences have none.
    pub fn pending_mut(&mut self, kind: SyncRecordType) -> Option<&mut u64> {
        match kind {
            SyncRecordType::Order => Some(&mut self.pending_orders),
            SyncRecordType::Inquiry => Some(&mut self.pending_inquiries),
            SyncRecordType::Preferences => None,
        }
    }
}
