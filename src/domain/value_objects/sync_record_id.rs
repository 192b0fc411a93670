use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::SyncRecordType;

const SUFFIX_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncRecordId(String);

impl SyncRecordId {
    pub fn new(value: String) -> Result<Self, String> {
        if value.trim().is_empty() {
            return Err("Sync record id cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// `<type>_<timestamp_ms>_<random suffix>`
    pub fn generate(kind: SyncRecordType, timestamp_ms: i64) -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(|byte| char::from(byte).to_ascii_lowercase())
            .collect();
        Self(format!("{}_{}_{}", kind.as_str(), timestamp_ms, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SyncRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SyncRecordId> for String {
    fn from(id: SyncRecordId) -> Self {
        id.0
    }
}
