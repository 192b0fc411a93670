use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SyncRecordRow {
    pub id: String,
    pub record_type: String,
    pub data: String,
    pub timestamp: i64,
    pub retry_count: i64,
    pub status: String,
}
