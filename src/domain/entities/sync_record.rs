use crate::domain::value_objects::{SyncData, SyncRecordId, SyncRecordStatus, SyncRecordType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecord {
    pub id: SyncRecordId,
    #[serde(rename = "type")]
    pub kind: SyncRecordType,
    pub data: SyncData,
    /// Creation time in milliseconds since the epoch.
    pub timestamp: i64,
    pub retry_count: u32,
    pub status: SyncRecordStatus,
}

impl SyncRecord {
    pub fn new_pending(kind: SyncRecordType, data: SyncData, timestamp: i64) -> Self {
        Self {
            id: SyncRecordId::generate(kind, timestamp),
            kind,
            data,
            timestamp,
            retry_count: 0,
            status: SyncRecordStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_record_starts_pending() {
        let data = SyncData::new(json!({"theme": "dark"})).unwrap();
        let record = SyncRecord::new_pending(SyncRecordType::Preferences, data, 1_000);

        assert_eq!(record.status, SyncRecordStatus::Pending);
        assert_eq!(record.retry_count, 0);
        assert_eq!(record.timestamp, 1_000);
        assert!(record.id.as_str().starts_with("preferences_1000_"));
    }

    #[test]
    fn test_serializes_with_type_discriminant() {
        let data = SyncData::new(json!({"message": "hi"})).unwrap();
        let record = SyncRecord::new_pending(SyncRecordType::Inquiry, data, 5);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["type"], "inquiry");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["retryCount"], 0);
    }
}
