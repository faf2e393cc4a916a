use super::record::HistoryKind;
use chrono::{DateTime, Local, NaiveDate};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Addresses one partition file: a (kind, local calendar date) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionKey {
    pub kind: HistoryKind,
    pub date: NaiveDate,
}

impl PartitionKey {
    pub fn new(kind: HistoryKind, date: NaiveDate) -> Self {
        Self { kind, date }
    }

    /// Partition that a record stamped at `timestamp` belongs to.
    pub fn for_timestamp(kind: HistoryKind, timestamp: &DateTime<Local>) -> Self {
        Self::new(kind, timestamp.date_naive())
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.date.format(DATE_FORMAT))
    }

    /// `<root>/history/<kind>/<YYYY-MM-DD>.json`
    pub fn path_under(&self, root: &Path) -> PathBuf {
        kind_dir(root, self.kind).join(self.file_name())
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.date.format(DATE_FORMAT))
    }
}

pub fn kind_dir(root: &Path, kind: HistoryKind) -> PathBuf {
    root.join("history").join(kind.as_str())
}

/// Parse the date out of a partition file name, `None` for anything else.
pub fn date_from_file_name(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(".json")?;
    NaiveDate::parse_from_str(stem, DATE_FORMAT).ok()
}
