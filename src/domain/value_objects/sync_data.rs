use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque record payload. The queue never looks inside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SyncData(Value);

impl SyncData {
    pub fn new(value: Value) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| format!("Invalid JSON payload: {e}"))?;
        Self::new(value)
    }

    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    fn validate(value: &Value) -> Result<(), String> {
        if value.is_null() {
            return Err("Sync payload cannot be null".to_string());
        }
        Ok(())
    }
}

impl From<SyncData> for Value {
    fn from(payload: SyncData) -> Self {
        payload.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_payload_rejected() {
        assert!(SyncData::new(Value::Null).is_err());
        assert!(SyncData::from_json_str("null").is_err());
        assert!(SyncData::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_payload_kept_verbatim() {
        let data = SyncData::from_json_str(r#"{"productId":"rose-01","quantity":2}"#).unwrap();
        assert_eq!(data.as_json(), &json!({"productId": "rose-01", "quantity": 2}));
    }
}
