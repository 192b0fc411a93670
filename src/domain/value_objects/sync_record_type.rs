use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncRecordType {
    Order,
    Inquiry,
    Preferences,
}

impl SyncRecordType {
    pub const ALL: [SyncRecordType; 3] = [
        SyncRecordType::Order,
        SyncRecordType::Inquiry,
        SyncRecordType::Preferences,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncRecordType::Order => "order",
            SyncRecordType::Inquiry => "inquiry",
            SyncRecordType::Preferences => "preferences",
        }
    }
}

impl fmt::Display for SyncRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncRecordType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "order" => Ok(SyncRecordType::Order),
            "inquiry" => Ok(SyncRecordType::Inquiry),
            "preferences" => Ok(SyncRecordType::Preferences),
            other => Err(format!("Unknown sync record type: {other}")),
        }
    }
}
