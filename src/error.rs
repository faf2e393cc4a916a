//! Error types for history persistence.

use std::path::PathBuf;

/// Errors raised while reading or writing partition files.
///
/// These never reach callers of the `record_*` operations; the store logs them
/// and drops the record.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// Filesystem failure (directory creation, read, write, rename).
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing partition file does not hold a JSON array of records.
    #[error("corrupt partition {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The corrupt-partition policy refused to touch an unreadable partition.
    #[error("partition {partition} is unreadable and was left untouched: {source}")]
    Refused {
        partition: String,
        #[source]
        source: Box<HistoryError>,
    },

    #[error("partition lock table poisoned")]
    Lock,
}

impl HistoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type HistoryResult<T> = Result<T, HistoryError>;
