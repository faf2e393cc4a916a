//! In-Memory Partition Storage
//!
//! Information Hiding:
//! - HashMap keyed by partition hidden from users
//! - Thread-safe access via RwLock hidden behind async interface
//! - Suitable for testing and ephemeral stores

use super::PartitionStorage;
use crate::error::HistoryResult;
use crate::history::{HistoryKind, HistoryRecord, PartitionKey};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage using HashMap
/// Data is lost when process terminates
pub struct InMemoryStorage {
    partitions: Arc<RwLock<HashMap<PartitionKey, Vec<HistoryRecord>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            partitions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PartitionStorage for InMemoryStorage {
    async fn load(&self, key: &PartitionKey) -> HistoryResult<Vec<HistoryRecord>> {
        let partitions = self.partitions.read().await;
        let records = partitions.get(key).cloned().unwrap_or_default();
        tracing::debug!("[InMemoryStorage] Loaded {} records for {}", records.len(), key);
        Ok(records)
    }

    async fn save(&self, key: &PartitionKey, records: &[HistoryRecord]) -> HistoryResult<()> {
        let mut partitions = self.partitions.write().await;
        partitions.insert(*key, records.to_vec());
        tracing::debug!("[InMemoryStorage] Saved {} records for {}", records.len(), key);
        Ok(())
    }

    async fn list_dates(&self, kind: HistoryKind) -> HistoryResult<Vec<NaiveDate>> {
        let partitions = self.partitions.read().await;
        let mut dates: Vec<NaiveDate> = partitions
            .keys()
            .filter(|key| key.kind == kind)
            .map(|key| key.date)
            .collect();
        dates.sort();
        Ok(dates)
    }

    async fn quarantine(
        &self,
        key: &PartitionKey,
        _at: DateTime<Local>,
    ) -> HistoryResult<Option<PathBuf>> {
        let mut partitions = self.partitions.write().await;
        partitions.remove(key);
        tracing::debug!("[InMemoryStorage] Dropped partition {}", key);
        Ok(None)
    }
}
