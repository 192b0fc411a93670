use crate::domain::value_objects::{
    SyncData, SyncOutcome, SyncRecordId, SyncRecordType, SyncScope,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fire-and-forget notification posted to the delivery channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    StoreOrder { payload: Value },
    StoreInquiry { payload: Value },
    StorePreferences { payload: Value },
    RequestSync,
}

impl OutboundMessage {
    /// Payload is the record data with `syncId` merged in when a record exists.
    pub fn store(kind: SyncRecordType, data: &SyncData, sync_id: Option<&SyncRecordId>) -> Self {
        let mut payload = data.as_json().clone();
        if let (Some(id), Value::Object(map)) = (sync_id, &mut payload) {
            map.insert("syncId".to_string(), Value::String(id.to_string()));
        }

        match kind {
            SyncRecordType::Order => OutboundMessage::StoreOrder { payload },
            SyncRecordType::Inquiry => OutboundMessage::StoreInquiry { payload },
            SyncRecordType::Preferences => OutboundMessage::StorePreferences { payload },
        }
    }

    pub fn message_type(&self) -> &'static str {
        match self {
            OutboundMessage::StoreOrder { .. } => "STORE_ORDER",
            OutboundMessage::StoreInquiry { .. } => "STORE_INQUIRY",
            OutboundMessage::StorePreferences { .. } => "STORE_PREFERENCES",
            OutboundMessage::RequestSync => "REQUEST_SYNC",
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            OutboundMessage::StoreOrder { payload }
            | OutboundMessage::StoreInquiry { payload }
            | OutboundMessage::StorePreferences { payload } => Some(payload),
            OutboundMessage::RequestSync => None,
        }
    }
}

/// Message received back from the delivery channel.
///
/// The discriminant is kept as a raw string so that unknown message types
/// survive transport and can be ignored by the listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl InboundMessage {
    pub fn new(message_type: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            message_type: message_type.into(),
            data,
        }
    }

    pub fn outcome(scope: SyncScope, outcome: SyncOutcome, data: Option<Value>) -> Self {
        Self::new(scope.message_type(outcome), data)
    }

    /// Returns `None` when the value carries no string `type`.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    pub fn event(&self) -> Option<(SyncScope, SyncOutcome)> {
        SyncScope::parse_message_type(&self.message_type)
    }

    /// Record ids named by `data.syncIds` or `data.syncId`.
    ///
    /// `None` when neither key is present. An explicit list whose
    /// entries are all empty or malformed yields `Some` of an empty Vec.
    pub fn sync_ids(&self) -> Option<Vec<SyncRecordId>> {
        let data = self.data.as_ref()?;

        if let Some(ids) = data.get("syncIds").filter(|value| !value.is_null()) {
            let ids = ids
                .as_array()
                .map(|ids| {
                    ids.iter()
                        .filter_map(Value::as_str)
                        .filter_map(|id| SyncRecordId::new(id.to_string()).ok())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            return Some(ids);
        }

        let id = data.get("syncId").filter(|value| !value.is_null())?;
        Some(
            id.as_str()
                .and_then(|id| SyncRecordId::new(id.to_string()).ok())
                .into_iter()
                .collect(),
        )
    }

    pub fn error_detail(&self) -> Option<String> {
        let error = self.data.as_ref()?.get("error")?;
        match error {
            Value::String(message) => Some(message.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn retry_count(&self) -> Option<u32> {
        self.data
            .as_ref()?
            .get("retryCount")?
            .as_u64()
            .and_then(|value| u32::try_from(value).ok())
    }
}
