pub mod file_store;
pub mod memory_store;

pub use file_store::JsonFileFallbackStore;
pub use memory_store::MemoryFallbackStore;
