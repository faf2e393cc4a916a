//! Translog - history persistence for translation and explanation events
//!
//! Finished translations and explanations are appended to date-partitioned
//! JSON files so they can be reviewed later. Build one [`HistoryStore`] at
//! startup from [`Settings`] and hand it to whatever produces events.
//!
//! ```no_run
//! use translog::{HistoryStore, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     let store = HistoryStore::new(&settings.history);
//!     store.record_translation("Hello world", "你好世界", "en", "zh").await;
//!     Ok(())
//! }
//! ```

mod config;
pub mod error;
pub mod history;
pub mod storage;
pub mod utils;

pub mod cli;

pub use crate::config::{CorruptPolicy, HistoryConfig, LoggingConfig, Settings};
pub use error::{HistoryError, HistoryResult};
pub use history::{HistoryKind, HistoryRecord, HistoryStore, PartitionKey};
pub use storage::{FileSystemStorage, InMemoryStorage, PartitionStorage};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. `logging.level`) is used.
pub fn init_tracing(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
