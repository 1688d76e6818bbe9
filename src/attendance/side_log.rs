use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// One row of the auxiliary scan log
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub timestamp: DateTime<Utc>,
    pub student_id_str: String,
    pub name: String,
    pub card_uid: String,
}

/// Fire-and-forget sink for attendance scans. The sink is
/// non-authoritative: callers log and swallow its errors, and a failed
/// write never affects the primary ledger record.
#[async_trait]
pub trait ScanSink {
    async fn record(&self, entry: &ScanEntry) -> std::io::Result<()>;
}

/// Sink that discards every entry, for deployments without a local log
pub struct NullSink;

#[async_trait]
impl ScanSink for NullSink {
    async fn record(&self, _entry: &ScanEntry) -> std::io::Result<()> {
        Ok(())
    }
}

/// Appends scan rows to a local CSV file, writing the header row when
/// the file is first created
pub struct CsvScanSink {
    path: PathBuf,
}

impl CsvScanSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Quotes a field when it contains a separator, quote, or line break,
/// doubling embedded quotes per RFC 4180
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[async_trait]
impl ScanSink for CsvScanSink {
    #[instrument(skip(self, entry))]
    async fn record(&self, entry: &ScanEntry) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file_exists = tokio::fs::try_exists(&self.path).await?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        if !file_exists {
            file.write_all(b"Timestamp,Student_ID,Name,Card_UID\n")
                .await?;
        }

        let row = format!(
            "{},{},{},{}\n",
            entry.timestamp.to_rfc3339(),
            csv_field(&entry.student_id_str),
            csv_field(&entry.name),
            csv_field(&entry.card_uid)
        );
        file.write_all(row.as_bytes()).await?;
        file.flush().await?;

        debug!(card_uid = %entry.card_uid, "Scan entry appended to CSV log");
        Ok(())
    }
}
