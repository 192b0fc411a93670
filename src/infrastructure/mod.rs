pub mod delivery;
pub mod fallback;
pub mod offline;
