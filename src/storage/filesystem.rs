//! File System Partition Storage
//!
//! Information Hiding:
//! - Directory tree and file naming hidden from the store
//! - JSON encoding (pretty-printed array) hidden behind the trait
//! - Writes go through a temp file and a rename

use super::PartitionStorage;
use crate::error::{HistoryError, HistoryResult};
use crate::history::partition::{date_from_file_name, kind_dir};
use crate::history::{HistoryKind, HistoryRecord, PartitionKey};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File system storage - one JSON array file per partition.
/// Files are stored as {root}/history/{kind}/{YYYY-MM-DD}.json
pub struct FileSystemStorage {
    root: PathBuf,
}

impl FileSystemStorage {
    /// Nothing is created on disk until the first `save`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn partition_path(&self, key: &PartitionKey) -> PathBuf {
        key.path_under(&self.root)
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl PartitionStorage for FileSystemStorage {
    async fn load(&self, key: &PartitionKey) -> HistoryResult<Vec<HistoryRecord>> {
        let path = self.partition_path(key);

        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("[FileSystemStorage] Partition {} does not exist", key);
                return Ok(Vec::new());
            }
            Err(e) => return Err(HistoryError::io(path, e)),
        };

        // A literal `null` is accepted as an empty partition.
        let records: Option<Vec<HistoryRecord>> = serde_json::from_str(&json)
            .map_err(|source| HistoryError::Corrupt {
                path: path.clone(),
                source,
            })?;
        let records = records.unwrap_or_default();

        tracing::debug!(
            "[FileSystemStorage] Loaded {} records for {} from {:?}",
            records.len(),
            key,
            path
        );
        Ok(records)
    }

    async fn save(&self, key: &PartitionKey, records: &[HistoryRecord]) -> HistoryResult<()> {
        let path = self.partition_path(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| HistoryError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(records)?;

        let temp = Self::temp_path(&path);
        if let Err(e) = fs::write(&temp, json).await {
            let _ = fs::remove_file(&temp).await;
            return Err(HistoryError::io(temp, e));
        }
        if let Err(e) = fs::rename(&temp, &path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(HistoryError::io(path, e));
        }

        tracing::debug!(
            "[FileSystemStorage] Saved {} records for {} to {:?}",
            records.len(),
            key,
            path
        );
        Ok(())
    }

    async fn list_dates(&self, kind: HistoryKind) -> HistoryResult<Vec<NaiveDate>> {
        let dir = kind_dir(&self.root, kind);

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HistoryError::io(dir, e)),
        };

        let mut dates = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| HistoryError::io(&dir, e))?
        {
            if let Some(date) = entry.file_name().to_str().and_then(date_from_file_name) {
                dates.push(date);
            }
        }
        dates.sort();

        tracing::debug!("[FileSystemStorage] Listed {} {} partitions", dates.len(), kind);
        Ok(dates)
    }

    async fn quarantine(
        &self,
        key: &PartitionKey,
        at: DateTime<Local>,
    ) -> HistoryResult<Option<PathBuf>> {
        let path = self.partition_path(key);

        let mut target = path.as_os_str().to_owned();
        target.push(format!(".corrupt-{}", at.timestamp_millis()));
        let target = PathBuf::from(target);

        match fs::rename(&path, &target).await {
            Ok(()) => {
                tracing::debug!("[FileSystemStorage] Moved {:?} to {:?}", path, target);
                Ok(Some(target))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HistoryError::io(path, e)),
        }
    }
}
