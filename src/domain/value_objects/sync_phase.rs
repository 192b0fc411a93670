use serde::{Deserialize, Serialize};

/// Per-domain sync indicator shown to the user. Distinct from the stored
/// record status: it tracks the last dispatch or outcome seen for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    #[default]
    Idle,
    Syncing,
    Success,
    Error,
}

impl SyncPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncPhase::Idle => "idle",
            SyncPhase::Syncing => "syncing",
            SyncPhase::Success => "success",
            SyncPhase::Error => "error",
        }
    }
}
