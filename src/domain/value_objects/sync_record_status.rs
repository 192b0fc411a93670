use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a stored sync record.
///
/// ```text
/// pending -> syncing -> success
///    ^          |
///    |          v
///    +------- error
/// ```
///
/// `error` may also re-enter `syncing` directly when a retry is dispatched.
/// `success` is terminal until housekeeping deletes the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncRecordStatus {
    Pending,
    Syncing,
    Success,
    Error,
}

impl SyncRecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncRecordStatus::Pending => "pending",
            SyncRecordStatus::Syncing => "syncing",
            SyncRecordStatus::Success => "success",
            SyncRecordStatus::Error => "error",
        }
    }

    pub fn can_transition_to(&self, next: SyncRecordStatus) -> bool {
        use SyncRecordStatus::*;
        matches!(
            (self, next),
            (Pending, Syncing)
                | (Syncing, Success)
                | (Syncing, Error)
                | (Error, Pending)
                | (Error, Syncing)
        )
    }

    /// Statuses to apply, in order, to move from `self` to `target`.
    ///
    /// An outcome reported for a record that was never marked `syncing` goes
    /// through `syncing` first. Returns `None` when `target` is unreachable.
    pub fn path_to(&self, target: SyncRecordStatus) -> Option<Vec<SyncRecordStatus>> {
        if *self == target {
            return Some(Vec::new());
        }
        if self.can_transition_to(target) {
            return Some(vec![target]);
        }
        if self.can_transition_to(SyncRecordStatus::Syncing)
            && SyncRecordStatus::Syncing.can_transition_to(target)
        {
            return Some(vec![SyncRecordStatus::Syncing, target]);
        }
        None
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncRecordStatus::Success)
    }
}

impl fmt::Display for SyncRecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncRecordStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(SyncRecordStatus::Pending),
            "syncing" => Ok(SyncRecordStatus::Syncing),
            "success" => Ok(SyncRecordStatus::Success),
            "error" => Ok(SyncRecordStatus::Error),
            other => Err(format!("Unknown sync record status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SyncRecordStatus::*;
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(Pending.can_transition_to(Syncing));
        assert!(Syncing.can_transition_to(Success));
        assert!(Syncing.can_transition_to(Error));
        assert!(Error.can_transition_to(Pending));
        assert!(Error.can_transition_to(Syncing));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!Pending.can_transition_to(Success));
        assert!(!Pending.can_transition_to(Error));
        assert!(!Success.can_transition_to(Pending));
        assert!(!Success.can_transition_to(Syncing));
        assert!(!Success.can_transition_to(Error));
        assert!(!Syncing.can_transition_to(Pending));
        assert!(!Error.can_transition_to(Success));
    }

    #[test]
    fn test_path_goes_through_syncing() {
        assert_eq!(Pending.path_to(Success), Some(vec![Syncing, Success]));
        assert_eq!(Pending.path_to(Error), Some(vec![Syncing, Error]));
        assert_eq!(Error.path_to(Success), Some(vec![Syncing, Success]));
        assert_eq!(Syncing.path_to(Success), Some(vec![Success]));
        assert_eq!(Success.path_to(Success), Some(vec![]));
        assert_eq!(Success.path_to(Error), None);
    }

    #[test]
    fn test_parse_unknown_status() {
        assert_eq!("error".parse::<SyncRecordStatus>().unwrap(), Error);
        assert!("failed".parse::<SyncRecordStatus>().is_err());
    }
}
