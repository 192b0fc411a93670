pub mod mock_fallback_store;
pub mod mock_record_store;

pub use mock_fallback_store::*;
pub use mock_record_store::*;
