use super::mappers::sync_record_from_row;
use super::rows::SyncRecordRow;
use crate::application::ports::SyncRecordStore;
use crate::domain::entities::{PendingCounts, SyncRecord};
use crate::domain::value_objects::{SyncData, SyncRecordId, SyncRecordStatus, SyncRecordType};
use crate::shared::config::DatabaseConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Bumped whenever the `sync_data` layout changes. Records are short-lived
/// retry state, so a mismatch drops the table instead of migrating it.
pub const SCHEMA_VERSION: i64 = 1;

pub struct SqliteSyncRecordStore {
    pool: Pool<Sqlite>,
    opened: OnceCell<()>,
}

impl SqliteSyncRecordStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            pool,
            opened: OnceCell::new(),
        }
    }

    /// Builds the pool without touching the database; the first operation opens it.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| {
                AppError::ConfigurationError(format!("Invalid database url {}: {e}", config.url))
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy_with(options);

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn ensure_open(&self) -> Result<(), AppError> {
        self.opened
            .get_or_try_init(|| self.initialize_schema())
            .await
            .map(|_| ())
    }

    /// Checks `allowed` against the stored status and writes the new one in
    /// a single transaction.
    async fn write_status<F>(
        &self,
        id: &SyncRecordId,
        status: SyncRecordStatus,
        retry_count: Option<u32>,
        allowed: F,
    ) -> Result<(), AppError>
    where
        F: Fn(SyncRecordStatus) -> bool + Send,
    {
        self.ensure_open().await?;

        let mut tx = self.pool.begin().await.map_err(write_error)?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM sync_data WHERE id = ?1")
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await?;

        let Some(current) = current else {
            return Err(AppError::NotFound(format!("Sync record {id}")));
        };
        let current = current
            .parse::<SyncRecordStatus>()
            .map_err(AppError::DeserializationError)?;

        if !allowed(current) {
            return Err(AppError::InvalidTransition(format!(
                "{id}: {current} -> {status}"
            )));
        }

        sqlx::query(
            r#"
            UPDATE sync_data
            SET status = ?1, retry_count = COALESCE(?2, retry_count)
            WHERE id = ?3
            "#,
        )
        .bind(status.as_str())
        .bind(retry_count.map(i64::from))
        .bind(id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(write_error)?;

        tx.commit().await.map_err(write_error)?;

        debug!(id = %id, from = %current, to = %status, "Sync record status updated");
        Ok(())
    }

    async fn initialize_schema(&self) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(storage_unavailable)?;

        let version: i64 = sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(&mut *tx)
            .await
            .map_err(storage_unavailable)?;

        if version != SCHEMA_VERSION {
            if version != 0 {
                warn!(
                    found = version,
                    expected = SCHEMA_VERSION,
                    "Sync store schema mismatch, recreating sync_data"
                );
            }
            sqlx::query("DROP TABLE IF EXISTS sync_data")
                .execute(&mut *tx)
                .await
                .map_err(storage_unavailable)?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sync_data (
                id TEXT PRIMARY KEY NOT NULL,
                record_type TEXT NOT NULL,
                data TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                retry_count INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(storage_unavailable)?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_sync_data_type ON sync_data(record_type)",
            "CREATE INDEX IF NOT EXISTS idx_sync_data_status ON sync_data(status)",
            "CREATE INDEX IF NOT EXISTS idx_sync_data_timestamp ON sync_data(timestamp)",
        ] {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(storage_unavailable)?;
        }

        if version != SCHEMA_VERSION {
            // PRAGMA does not accept bound parameters
            sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
                .execute(&mut *tx)
                .await
                .map_err(storage_unavailable)?;
        }

        tx.commit().await.map_err(storage_unavailable)?;
        info!(schema_version = SCHEMA_VERSION, "Sync store opened");
        Ok(())
    }
}

fn storage_unavailable(err: sqlx::Error) -> AppError {
    AppError::StorageUnavailable(err.to_string())
}

fn write_error(err: sqlx::Error) -> AppError {
    AppError::WriteError(err.to_string())
}

#[async_trait]
impl SyncRecordStore for SqliteSyncRecordStore {
    async fn open(&self) -> Result<(), AppError> {
        self.ensure_open().await
    }

    async fn add(&self, kind: SyncRecordType, data: SyncData) -> Result<SyncRecordId, AppError> {
        self.ensure_open().await?;

        let record = SyncRecord::new_pending(kind, data, Utc::now().timestamp_millis());

        sqlx::query(
            r#"
            INSERT INTO sync_data (id, record_type, data, timestamp, retry_count, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.kind.as_str())
        .bind(record.data.to_json_string())
        .bind(record.timestamp)
        .bind(i64::from(record.retry_count))
        .bind(record.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        debug!(id = %record.id, kind = %kind, "Sync record added");
        Ok(record.id)
    }

    async fn get(&self, id: &SyncRecordId) -> Result<Option<SyncRecord>, AppError> {
        self.ensure_open().await?;

        let row = sqlx::query_as::<_, SyncRecordRow>(
            r#"
            SELECT id, record_type, data, timestamp, retry_count, status
            FROM sync_data
            WHERE id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(sync_record_from_row).transpose()
    }

    async fn get_by_status(
        &self,
        status: SyncRecordStatus,
        kind: Option<SyncRecordType>,
    ) -> Result<Vec<SyncRecord>, AppError> {
        self.ensure_open().await?;

        let rows = sqlx::query_as::<_, SyncRecordRow>(
            r#"
            SELECT id, record_type, data, timestamp, retry_count, status
            FROM sync_data
            WHERE status = ?1 AND (?2 IS NULL OR record_type = ?2)
            "#,
        )
        .bind(status.as_str())
        .bind(kind.map(|kind| kind.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(sync_record_from_row).collect()
    }

    async fn update_status(
        &self,
        id: &SyncRecordId,
        status: SyncRecordStatus,
        retry_count: Option<u32>,
    ) -> Result<(), AppError> {
        self.write_status(id, status, retry_count, move |current| {
            current == status || current.can_transition_to(status)
        })
        .await
    }

    async fn advance_status(
        &self,
        id: &SyncRecordId,
        status: SyncRecordStatus,
        retry_count: Option<u32>,
    ) -> Result<(), AppError> {
        self.write_status(id, status, retry_count, move |current| {
            current.path_to(status).is_some()
        })
        .await
    }

    async fn delete(&self, id: &SyncRecordId) -> Result<(), AppError> {
        self.ensure_open().await?;

        sqlx::query("DELETE FROM sync_data WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn pending_counts(&self) -> Result<PendingCounts, AppError> {
        let pending = self.get_by_status(SyncRecordStatus::Pending, None).await?;
        Ok(PendingCounts::tally(&pending))
    }

    async fn clear_successful(&self) -> Result<u64, AppError> {
        self.ensure_open().await?;

        let result = sqlx::query("DELETE FROM sync_data WHERE status = ?1")
            .bind(SyncRecordStatus::Success.as_str())
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        Ok(result.rows_affected())
    }
}
