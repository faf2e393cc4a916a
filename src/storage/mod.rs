//! Partition Storage Abstraction
//!
//! Information Hiding:
//! - Where and how a partition's records are persisted is hidden behind the trait
//! - The store only deals in `PartitionKey`s and record slices
//! - Each backend owns its own layout and encoding

use crate::error::HistoryResult;
use crate::history::{HistoryKind, HistoryRecord, PartitionKey};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};
use std::path::PathBuf;

pub mod filesystem;
pub mod memory;

pub use filesystem::FileSystemStorage;
pub use memory::InMemoryStorage;

/// Whole-partition persistence. Every `save` replaces the partition's contents.
///
/// Implementations do no locking of their own across a load/save pair; the
/// history store serializes access per partition.
#[async_trait]
pub trait PartitionStorage: Send + Sync {
    /// Load all records of a partition in insertion order.
    /// Returns an empty vector if the partition doesn't exist.
    async fn load(&self, key: &PartitionKey) -> HistoryResult<Vec<HistoryRecord>>;

    /// Replace the partition with `records`, creating it if needed.
    async fn save(&self, key: &PartitionKey, records: &[HistoryRecord]) -> HistoryResult<()>;

    /// Dates that have a partition of the given kind, oldest first.
    async fn list_dates(&self, kind: HistoryKind) -> HistoryResult<Vec<NaiveDate>>;

    /// Move an unreadable partition out of the way, tagging it with `at`.
    /// Returns where it went, if the backend keeps it.
    async fn quarantine(
        &self,
        key: &PartitionKey,
        at: DateTime<Local>,
    ) -> HistoryResult<Option<PathBuf>>;
}
