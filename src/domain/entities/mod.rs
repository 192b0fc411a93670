pub mod delivery_message;
pub mod pending_counts;
pub mod sync_payload;
pub mod sync_record;
pub mod sync_state;

pub use delivery_message::{InboundMessage, OutboundMessage};
pub use pending_counts::PendingCounts;
pub use sync_payload::{
    InquiryContact, InquiryData, NotificationSettings, OrderCustomer, OrderData, SyncPayload,
    Theme, UserPreferences,
};
pub use sync_record::SyncRecord;
pub use sync_state::{BackgroundSyncState, SyncStatusBoard};
