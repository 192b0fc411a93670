use anyhow::{Context, Result, bail};
use chrono::Utc;
use miracle_sync::{
    AppConfig, PendingCounts, SqliteSyncRecordStore, SyncRecord, SyncRecordStatus,
    SyncRecordStore, SyncRecordType,
};
use std::env;
use tokio::runtime::Runtime;

const ALL_STATUSES: [SyncRecordStatus; 4] = [
    SyncRecordStatus::Pending,
    SyncRecordStatus::Syncing,
    SyncRecordStatus::Error,
    SyncRecordStatus::Success,
];

#[derive(Debug, Clone, Default)]
struct CliOptions {
    database_url: Option<String>,
    status: Option<SyncRecordStatus>,
    kind: Option<SyncRecordType>,
    clear_successful: bool,
    pretty: bool,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct QueueReport {
    database_url: String,
    generated_at_ms: i64,
    cleared_successful: Option<u64>,
    pending_counts: PendingCounts,
    record_count: usize,
    records: Vec<SyncRecord>,
}

fn usage() -> &'static str {
    "Usage: sync_queue_report [--database-url <url>] [--status <pending|syncing|success|error>] [--type <order|inquiry|preferences>] [--clear-successful] [--pretty]"
}

fn main() -> Result<()> {
    miracle_sync::init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(args)?;
    let database_url = resolve_database_url(&options);

    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let report = rt.block_on(async {
        collect_report(&database_url, &options)
            .await
            .with_context(|| format!("Failed to read sync queue at {database_url}"))
    })?;

    let payload = if options.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{payload}");
    Ok(())
}

fn parse_args<I>(args: I) -> Result<CliOptions>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions::default();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--database-url" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--database-url requires a value\n{}", usage())
                })?;
                options.database_url = Some(value);
            }
            "--status" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--status requires a value\n{}", usage()))?;
                let parsed = value.parse::<SyncRecordStatus>().map_err(anyhow::Error::msg)?;
                options.status = Some(parsed);
            }
            "--type" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--type requires a value\n{}", usage()))?;
                let parsed = value.parse::<SyncRecordType>().map_err(anyhow::Error::msg)?;
                options.kind = Some(parsed);
            }
            "--clear-successful" => {
                options.clear_successful = true;
            }
            "--pretty" => {
                options.pretty = true;
            }
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other => {
                bail!("Unknown argument: {other}\n{}", usage());
            }
        }
    }

    Ok(options)
}

fn resolve_database_url(options: &CliOptions) -> String {
    if let Some(url) = &options.database_url {
        return url.clone();
    }
    AppConfig::from_env().database.url
}

async fn collect_report(database_url: &str, options: &CliOptions) -> Result<QueueReport> {
    let mut config = AppConfig::from_env().database;
    config.url = database_url.to_string();

    let store = SqliteSyncRecordStore::connect_lazy(&config)?;
    store.open().await?;

    let cleared_successful = if options.clear_successful {
        Some(store.clear_successful().await?)
    } else {
        None
    };

    let statuses = match options.status {
        Some(status) => vec![status],
        None => ALL_STATUSES.to_vec(),
    };

    let mut records = Vec::new();
    for status in statuses {
        records.extend(store.get_by_status(status, options.kind).await?);
    }
    records.sort_by_key(|record| record.timestamp);

    let pending_counts = store.pending_counts().await?;
    store.pool().close().await;

    Ok(QueueReport {
        database_url: database_url.to_string(),
        generated_at_ms: Utc::now().timestamp_millis(),
        cleared_successful,
        pending_counts,
        record_count: records.len(),
        records,
    })
}
