pub mod delivery_channel;
pub mod fallback_store;
pub mod sync_record_store;

pub use delivery_channel::{DeliveryChannel, DeliveryError};
pub use fallback_store::FallbackStore;
pub use sync_record_store::SyncRecordStore;
