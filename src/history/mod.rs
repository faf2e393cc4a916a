//! Translation and explanation history.
//!
//! Records are appended to one JSON file per (kind, local date) under
//! `<storage_path>/history/<kind>/<YYYY-MM-DD>.json`.

pub mod clock;
pub mod partition;
mod record;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use partition::PartitionKey;
pub use record::{HistoryKind, HistoryRecord};
pub use store::HistoryStore;
