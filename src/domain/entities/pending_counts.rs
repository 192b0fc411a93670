use crate::domain::entities::SyncRecord;
use crate::domain::value_objects::{SyncRecordStatus, SyncRecordType};
use serde::{Deserialize, Serialize};

/// Pending records per type. Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCounts {
    pub orders: u64,
    pub inquiries: u64,
    pub preferences: u64,
}

impl PendingCounts {
    pub fn tally<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SyncRecord>,
    {
        let mut counts = Self::default();
        for record in records {
            if record.status == SyncRecordStatus::Pending {
                *counts.slot_mut(record.kind) += 1;
            }
        }
        counts
    }

    /// Counts every record by type whatever its status.
    pub fn by_type<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SyncRecord>,
    {
        let mut counts = Self::default();
        for record in records {
            *counts.slot_mut(record.kind) += 1;
        }
        counts
    }

    pub fn combined(self, other: Self) -> Self {
        Self {
            orders: self.orders + other.orders,
            inquiries: self.inquiries + other.inquiries,
            preferences: self.preferences + other.preferences,
        }
    }

    pub fn get(&self, kind: SyncRecordType) -> u64 {
        match kind {
            SyncRecordType::Order => self.orders,
            SyncRecordType::Inquiry => self.inquiries,
            SyncRecordType::Preferences => self.preferences,
        }
    }

    pub fn total(&self) -> u64 {
        self.orders + self.inquiries + self.preferences
    }

    fn slot_mut(&mut self, kind: SyncRecordType) -> &mut u64 {
        match kind {
            SyncRecordType::Order => &mut self.orders,
            SyncRecordType::Inquiry => &mut self.inquiries,
            SyncRecordType::Preferences => &mut self.preferences,
        }
    }
}
