//! History Store
//!
//! Information Hiding:
//! - Identity and timestamp assignment hidden from callers
//! - Partition addressing and the read-append-write cycle hidden behind two calls
//! - Per-partition locking keeps concurrent appends to one file from racing
//! - Persistence failures are logged here and never reach the caller

use super::clock::{Clock, SystemClock};
use super::partition::PartitionKey;
use super::record::{HistoryKind, HistoryRecord};
use crate::config::{CorruptPolicy, HistoryConfig};
use crate::error::{HistoryError, HistoryResult};
use crate::storage::{FileSystemStorage, PartitionStorage};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

/// Append-only log of translation and explanation events.
///
/// Construct once at startup and share it by reference (or `Arc`) with every
/// component that records events.
pub struct HistoryStore {
    enabled: bool,
    on_corrupt: CorruptPolicy,
    storage: Arc<dyn PartitionStorage>,
    clock: Arc<dyn Clock>,
    locks: Mutex<HashMap<PartitionKey, Arc<AsyncMutex<()>>>>,
}

impl HistoryStore {
    /// Filesystem-backed store rooted at `config.storage_path`, stamped by the wall clock.
    pub fn new(config: &HistoryConfig) -> Self {
        Self::with_storage(
            config.enabled,
            Arc::new(FileSystemStorage::new(config.storage_path.clone())),
            Arc::new(SystemClock),
            config.on_corrupt,
        )
    }

    pub fn with_storage(
        enabled: bool,
        storage: Arc<dyn PartitionStorage>,
        clock: Arc<dyn Clock>,
        on_corrupt: CorruptPolicy,
    ) -> Self {
        tracing::debug!(
            "[HistoryStore] Created (enabled={}, on_corrupt={:?})",
            enabled,
            on_corrupt
        );

        Self {
            enabled,
            on_corrupt,
            storage,
            clock,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Local date of the store's clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    /// Log a finished translation. Does nothing when history is disabled.
    /// Storage failures are logged and otherwise swallowed.
    pub async fn record_translation(
        &self,
        source_text: &str,
        result: &str,
        from_lang: &str,
        to_lang: &str,
    ) {
        if let Err(e) = self
            .try_record_translation(source_text, result, from_lang, to_lang)
            .await
        {
            tracing::error!("[HistoryStore] Failed to save translate record: {}", e);
        }
    }

    /// Log a finished explanation. Both the term and the explanation text are kept.
    pub async fn record_explanation(&self, source_text: &str, result: &str, template_id: &str) {
        if let Err(e) = self
            .try_record_explanation(source_text, result, template_id)
            .await
        {
            tracing::error!("[HistoryStore] Failed to save explain record: {}", e);
        }
    }

    /// Like [`record_translation`](Self::record_translation) but reports the outcome.
    /// `Ok(None)` means history is disabled and nothing was written.
    pub async fn try_record_translation(
        &self,
        source_text: &str,
        result: &str,
        from_lang: &str,
        to_lang: &str,
    ) -> HistoryResult<Option<HistoryRecord>> {
        if !self.enabled {
            return Ok(None);
        }

        let record =
            HistoryRecord::translation(source_text, result, from_lang, to_lang, self.clock.now());
        let record = self.append(record).await?;

        tracing::info!("[HistoryStore] Saved translate record, id: {}", record.id);
        Ok(Some(record))
    }

    pub async fn try_record_explanation(
        &self,
        source_text: &str,
        result: &str,
        template_id: &str,
    ) -> HistoryResult<Option<HistoryRecord>> {
        if !self.enabled {
            return Ok(None);
        }

        let record = HistoryRecord::explanation(source_text, result, template_id, self.clock.now());
        let record = self.append(record).await?;

        tracing::info!(
            "[HistoryStore] Saved explain record, id: {}, term: {}",
            record.id,
            record.source_text
        );
        Ok(Some(record))
    }

    /// Records of one partition in insertion order. Works while disabled.
    pub async fn load_partition(
        &self,
        kind: HistoryKind,
        date: NaiveDate,
    ) -> HistoryResult<Vec<HistoryRecord>> {
        self.storage.load(&PartitionKey::new(kind, date)).await
    }

    /// Dates with a partition of `kind`, oldest first.
    pub async fn list_dates(&self, kind: HistoryKind) -> HistoryResult<Vec<NaiveDate>> {
        self.storage.list_dates(kind).await
    }

    async fn append(&self, record: HistoryRecord) -> HistoryResult<HistoryRecord> {
        let key = PartitionKey::for_timestamp(record.kind, &record.timestamp);

        let lock = self.partition_lock(&key)?;
        let _guard = lock.lock().await;

        let mut records = match self.storage.load(&key).await {
            Ok(records) => records,
            Err(e) => self.recover(&key, e).await?,
        };

        records.push(record.clone());
        self.storage.save(&key, &records).await?;

        Ok(record)
    }

    /// Decide what an unreadable partition turns into before the append.
    async fn recover(
        &self,
        key: &PartitionKey,
        err: HistoryError,
    ) -> HistoryResult<Vec<HistoryRecord>> {
        match self.on_corrupt {
            CorruptPolicy::Overwrite => {
                tracing::warn!(
                    "[HistoryStore] {}; partition {} will be rewritten from empty",
                    err,
                    key
                );
                Ok(Vec::new())
            }
            CorruptPolicy::Quarantine => {
                match self.storage.quarantine(key, self.clock.now()).await? {
                    Some(moved) => tracing::warn!(
                        "[HistoryStore] {}; moved aside to {:?}",
                        err,
                        moved
                    ),
                    None => tracing::warn!("[HistoryStore] {}; partition {} discarded", err, key),
                }
                Ok(Vec::new())
            }
            CorruptPolicy::Abort => Err(HistoryError::Refused {
                partition: key.to_string(),
                source: Box::new(err),
            }),
        }
    }

    fn partition_lock(&self, key: &PartitionKey) -> HistoryResult<Arc<AsyncMutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| HistoryError::Lock)?;
        Ok(locks.entry(*key).or_default().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::clock::ManualClock;
    use crate::storage::InMemoryStorage;
    use chrono::{Duration, Local, TimeZone};

    fn store(enabled: bool) -> (HistoryStore, Arc<InMemoryStorage>, Arc<ManualClock>) {
        let storage = Arc::new(InMemoryStorage::new());
        let clock = Arc::new(ManualClock::new(
            Local.with_ymd_and_hms(2024, 8, 15, 9, 0, 0).unwrap(),
        ));
        let store = HistoryStore::with_storage(
            enabled,
            storage.clone(),
            clock.clone(),
            CorruptPolicy::Overwrite,
        );
        (store, storage, clock)
    }

    #[tokio::test]
    async fn test_disabled_store_writes_nothing() {
        let (store, storage, _) = store(false);

        store.record_translation("Hello", "你好", "en", "zh").await;
        let outcome = store
            .try_record_explanation("term", "meaning", "t1")
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert!(storage.list_dates(HistoryKind::Translate).await.unwrap().is_empty());
        assert!(storage.list_dates(HistoryKind::Explain).await.unwrap().is_empty());
    }

    #[test]
    fn test_is_enabled_reflects_config() {
        assert!(store(true).0.is_enabled());
        assert!(!store(false).0.is_enabled());
    }

    #[tokio::test]
    async fn test_timestamp_comes_from_store_clock() {
        let (store, _, clock) = store(true);

        let record = store
            .try_record_translation("cat", "Katze", "en", "de")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.timestamp, clock.now());
        let loaded = store
            .load_partition(HistoryKind::Translate, store.today())
            .await
            .unwrap();
        assert_eq!(loaded, vec![record]);
    }

    #[tokio::test]
    async fn test_kinds_are_partitioned_separately() {
        let (store, _, _) = store(true);

        store.record_translation("cat", "Katze", "en", "de").await;
        store.record_explanation("cat", "a small feline", "t1").await;

        let today = store.today();
        let translations = store.load_partition(HistoryKind::Translate, today).await.unwrap();
        let explanations = store.load_partition(HistoryKind::Explain, today).await.unwrap();

        assert_eq!(translations.len(), 1);
        assert_eq!(translations[0].kind, HistoryKind::Translate);
        assert_eq!(explanations.len(), 1);
        assert_eq!(explanations[0].template_id, "t1");
    }

    #[tokio::test]
    async fn test_day_rollover_starts_new_partition() {
        let (store, _, clock) = store(true);

        store.record_translation("one", "eins", "en", "de").await;
        clock.advance(Duration::days(1));
        store.record_translation("two", "zwei", "en", "de").await;

        let dates = store.list_dates(HistoryKind::Translate).await.unwrap();
        assert_eq!(dates.len(), 2);
        for date in dates {
            let records = store.load_partition(HistoryKind::Translate, date).await.unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].timestamp.date_naive(), date);
        }
    }

    #[tokio::test]
    async fn test_same_partition_shares_one_lock() {
        let (store, _, _) = store(true);
        let key = PartitionKey::new(HistoryKind::Explain, store.today());
        let other = PartitionKey::new(HistoryKind::Translate, store.today());

        let a = store.partition_lock(&key).unwrap();
        let b = store.partition_lock(&key).unwrap();
        let c = store.partition_lock(&other).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
