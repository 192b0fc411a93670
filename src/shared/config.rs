use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DATABASE_FILE: &str = "miracle_flower_offline.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Error records with fewer attempts than this are re-enqueued on `request_sync`.
    pub max_retries: u32,
    pub cleanup_interval_secs: u64,
    pub message_buffer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub fallback_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            database: DatabaseConfig {
                url: database_url_for(&data_dir),
                max_connections: 1,
                connection_timeout: 30,
            },
            sync: SyncConfig::default(),
            storage: StorageConfig {
                data_dir,
                fallback_file: "fallback-counters.json".to_string(),
            },
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            cleanup_interval_secs: 300, // 5 minutes
            message_buffer: 64,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        // A custom data dir moves the default database along with it
        if let Ok(v) = std::env::var("MIRACLE_SYNC_DATA_DIR") {
            let dir = v.trim();
            if !dir.is_empty() {
                cfg.storage.data_dir = dir.to_string();
                cfg.database.url = database_url_for(dir);
            }
        }
        if let Ok(v) = std::env::var("MIRACLE_SYNC_DATABASE_URL") {
            let url = v.trim();
            if !url.is_empty() {
                cfg.database.url = url.to_string();
            }
        }
        if let Some(value) = env_parsed::<u32>("MIRACLE_SYNC_MAX_CONNECTIONS") {
            cfg.database.max_connections = value;
        }
        if let Some(value) = env_parsed::<u32>("MIRACLE_SYNC_MAX_RETRIES") {
            cfg.sync.max_retries = value;
        }
        if let Some(value) = env_parsed::<u64>("MIRACLE_SYNC_CLEANUP_INTERVAL_SECS") {
            cfg.sync.cleanup_interval_secs = value;
        }
        if let Some(value) = env_parsed::<usize>("MIRACLE_SYNC_MESSAGE_BUFFER") {
            cfg.sync.message_buffer = value;
        }
        if let Ok(v) = std::env::var("MIRACLE_SYNC_FALLBACK_FILE") {
            let file = v.trim();
            if !file.is_empty() {
                cfg.storage.fallback_file = file.to_string();
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.sync.message_buffer == 0 {
            return Err("Sync message_buffer must be greater than 0".to_string());
        }
        if self.sync.cleanup_interval_secs == 0 {
            return Err("Sync cleanup_interval_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn fallback_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir).join(&self.storage.fallback_file)
    }
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|dir| dir.join("miracle-flower"))
        .unwrap_or_else(|| PathBuf::from("./data"))
        .to_string_lossy()
        .into_owned()
}

fn database_url_for(data_dir: &str) -> String {
    let path = PathBuf::from(data_dir).join(DATABASE_FILE);
    format!("sqlite:{}", path.to_string_lossy())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
}
