use serde::{Deserialize, Serialize};
use std::fmt;

use super::SyncRecordType;

/// What a delivery-channel report is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncScope {
    Orders,
    Inquiries,
    Preferences,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    Complete,
    Error,
}

impl SyncScope {
    fn prefix(&self) -> &'static str {
        match self {
            SyncScope::Orders => "ORDERS",
            SyncScope::Inquiries => "INQUIRIES",
            SyncScope::Preferences => "PREFERENCES",
            SyncScope::General => "GENERAL",
        }
    }

    pub fn record_type(&self) -> Option<SyncRecordType> {
        match self {
            SyncScope::Orders => Some(SyncRecordType::Order),
            SyncScope::Inquiries => Some(SyncRecordType::Inquiry),
            SyncScope::Preferences => Some(SyncRecordType::Preferences),
            SyncScope::General => None,
        }
    }

    /// `ORDERS_SYNC_COMPLETE` style message discriminant.
    pub fn message_type(&self, outcome: SyncOutcome) -> String {
        let suffix = match outcome {
            SyncOutcome::Complete => "COMPLETE",
            SyncOutcome::Error => "ERROR",
        };
        format!("{}_SYNC_{}", self.prefix(), suffix)
    }

    pub fn parse_message_type(value: &str) -> Option<(SyncScope, SyncOutcome)> {
        let (prefix, outcome) = value.split_once("_SYNC_")?;
        let scope = match prefix {
            "ORDERS" => SyncScope::Orders,
            "INQUIRIES" => SyncScope::Inquiries,
            "PREFERENCES" => SyncScope::Preferences,
            "GENERAL" => SyncScope::General,
            _ => return None,
        };
        let outcome = match outcome {
            "COMPLETE" => SyncOutcome::Complete,
            "ERROR" => SyncOutcome::Error,
            _ => return None,
        };
        Some((scope, outcome))
    }
}

impl From<SyncRecordType> for SyncScope {
    fn from(kind: SyncRecordType) -> Self {
        match kind {
            SyncRecordType::Order => SyncScope::Orders,
            SyncRecordType::Inquiry => SyncScope::Inquiries,
            SyncRecordType::Preferences => SyncScope::Preferences,
        }
    }
}

impl fmt::Display for SyncScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix().to_ascii_lowercase())
    }
}
