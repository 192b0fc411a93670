pub mod sync_data;
pub mod sync_phase;
pub mod sync_record_id;
pub mod sync_record_status;
pub mod sync_record_type;
pub mod sync_scope;

pub use sync_data::SyncData;
pub use sync_phase::SyncPhase;
pub use sync_record_id::SyncRecordId;
pub use sync_record_status::SyncRecordStatus;
pub use sync_record_type::SyncRecordType;
pub use sync_scope::{SyncOutcome, SyncScope};
