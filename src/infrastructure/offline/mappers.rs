use super::rows::SyncRecordRow;
use crate::domain::entities::SyncRecord;
use crate::domain::value_objects::{SyncData, SyncRecordId, SyncRecordStatus, SyncRecordType};
use crate::shared::error::AppError;

pub fn sync_record_from_row(row: SyncRecordRow) -> Result<SyncRecord, AppError> {
    let SyncRecordRow {
        id,
        record_type,
        data,
        timestamp,
        retry_count,
        status,
    } = row;

    let id = SyncRecordId::new(id).map_err(AppError::DeserializationError)?;
    let kind = record_type
        .parse::<SyncRecordType>()
        .map_err(AppError::DeserializationError)?;
    let data = SyncData::from_json_str(&data).map_err(AppError::DeserializationError)?;
    let status = status
        .parse::<SyncRecordStatus>()
        .map_err(AppError::DeserializationError)?;
    let retry_count = u32::try_from(retry_count).map_err(|_| {
        AppError::DeserializationError(format!("Invalid retry_count {retry_count} for {id}"))
    })?;

    Ok(SyncRecord {
        id,
        kind,
        data,
        timestamp,
        retry_count,
        status,
    })
}
