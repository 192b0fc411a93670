use crate::domain::value_objects::{SyncData, SyncRecordType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    pub product_id: String,
    pub quantity: u32,
    pub customer_info: OrderCustomer,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryContact {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryData {
    pub product_id: String,
    pub message: String,
    pub customer_info: InquiryContact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub push: bool,
    pub email: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub favorite_categories: Vec<String>,
    pub notification_settings: NotificationSettings,
    pub theme: Theme,
}

/// A domain action waiting for delivery, discriminated by record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum SyncPayload {
    Order(OrderData),
    Inquiry(InquiryData),
    Preferences(UserPreferences),
}

impl SyncPayload {
    pub fn kind(&self) -> SyncRecordType {
        match self {
            SyncPayload::Order(_) => SyncRecordType::Order,
            SyncPayload::Inquiry(_) => SyncRecordType::Inquiry,
            SyncPayload::Preferences(_) => SyncRecordType::Preferences,
        }
    }

    /// Erases the domain shape into the opaque blob the store keeps.
    pub fn to_sync_data(&self) -> Result<SyncData, String> {
        let value = match self {
            SyncPayload::Order(order) => serde_json::to_value(order),
            SyncPayload::Inquiry(inquiry) => serde_json::to_value(inquiry),
            SyncPayload::Preferences(preferences) => serde_json::to_value(preferences),
        }
        .map_err(|e| format!("Failed to encode {} payload: {e}", self.kind()))?;
        SyncData::new(value)
    }

    pub fn from_sync_data(kind: SyncRecordType, data: &SyncData) -> Result<Self, String> {
        let value = data.as_json().clone();
        let decoded = match kind {
            SyncRecordType::Order => serde_json::from_value(value).map(SyncPayload::Order),
            SyncRecordType::Inquiry => serde_json::from_value(value).map(SyncPayload::Inquiry),
            SyncRecordType::Preferences => {
                serde_json::from_value(value).map(SyncPayload::Preferences)
            }
        };
        decoded.map_err(|e| format!("Failed to decode {kind} payload: {e}"))
    }
}

impl From<OrderData> for SyncPayload {
    fn from(order: OrderData) -> Self {
        SyncPayload::Order(order)
    }
}

impl From<InquiryData> for SyncPayload {
    fn from(inquiry: InquiryData) -> Self {
        SyncPayload::Inquiry(inquiry)
    }
}

impl From<UserPreferences> for SyncPayload {
    fn from(preferences: UserPreferences) -> Self {
        SyncPayload::Preferences(preferences)
    }
}
